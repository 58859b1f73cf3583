use super::*;

#[derive(Debug)]
pub(super) struct GqlEnumRenderer<'a> {
    enum_type: &'a EnumType,
}

impl<'a> GqlEnumRenderer<'a> {
    pub(super) fn new(enum_type: &'a EnumType) -> Self {
        GqlEnumRenderer { enum_type }
    }
}

impl<'a> Renderer for GqlEnumRenderer<'a> {
    fn render(&self, ctx: &mut RenderContext) -> String {
        let name = self.enum_type.name();

        if ctx.already_rendered(&name) {
            return "".into();
        }

        let values: Vec<String> = self
            .enum_type
            .values
            .iter()
            .map(|value| {
                format!(
                    "{}{}{}",
                    render_description(value.description.as_deref(), &ctx.indent()),
                    ctx.indent(),
                    value.name
                )
            })
            .collect();

        let rendered = format!(
            "{}enum {} {{\n{}\n}}",
            render_description(self.enum_type.description.as_deref(), ""),
            name,
            values.join("\n")
        );

        ctx.add(name, rendered.clone());

        rendered
    }
}
