use super::*;

#[derive(Debug)]
pub(super) enum GqlObjectRenderer<'a> {
    Input(&'a InputObjectType),
    Output(&'a ObjectType),
    Interface(&'a ObjectType),
}

impl<'a> Renderer for GqlObjectRenderer<'a> {
    fn render(&self, ctx: &mut RenderContext) -> String {
        match self {
            GqlObjectRenderer::Input(input) => self.render_input_object(input, ctx),
            GqlObjectRenderer::Output(output) => self.render_output_object("type", output, ctx),
            GqlObjectRenderer::Interface(interface) => self.render_output_object("interface", interface, ctx),
        }
    }
}

impl<'a> GqlObjectRenderer<'a> {
    fn render_input_object(&self, input_object: &'a InputObjectType, ctx: &mut RenderContext) -> String {
        let name = input_object.name();

        if ctx.already_rendered(&name) {
            return "".into();
        }

        let rendered_fields: Vec<String> = input_object
            .get_fields()
            .iter()
            .map(|field| field.as_renderer().render(ctx))
            .collect();

        let rendered = format!(
            "{}input {} {{\n{}\n}}",
            render_description(input_object.description.as_deref(), ""),
            name,
            self.indent_fields(rendered_fields, ctx)
        );

        ctx.add(name, rendered.clone());

        rendered
    }

    fn render_output_object(&self, keyword: &str, output_object: &'a ObjectType, ctx: &mut RenderContext) -> String {
        let name = output_object.name();

        if ctx.already_rendered(&name) {
            return "".into();
        }

        let rendered_fields: Vec<String> = output_object
            .get_fields()
            .iter()
            .map(|field| field.as_renderer().render(ctx))
            .collect();

        let implements = if output_object.interfaces.is_empty() {
            String::new()
        } else {
            format!(" implements {}", output_object.interfaces.join(" & "))
        };

        let rendered = format!(
            "{}{} {}{} {{\n{}\n}}",
            render_description(output_object.description.as_deref(), ""),
            keyword,
            name,
            implements,
            self.indent_fields(rendered_fields, ctx)
        );

        ctx.add(name, rendered.clone());

        rendered
    }

    fn indent_fields(&self, rendered_fields: Vec<String>, ctx: &RenderContext) -> String {
        rendered_fields
            .into_iter()
            .map(|f| {
                f.lines()
                    .map(|line| format!("{}{}", ctx.indent(), line))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
