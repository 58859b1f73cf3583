use super::*;

#[derive(Debug)]
pub(super) enum GqlFieldRenderer<'a> {
    Input(&'a InputField),
    Output(&'a OutputField),
}

impl<'a> Renderer for GqlFieldRenderer<'a> {
    fn render(&self, ctx: &mut RenderContext) -> String {
        match self {
            GqlFieldRenderer::Input(input) => self.render_input_field(input),
            GqlFieldRenderer::Output(output) => self.render_output_field(output, ctx),
        }
    }
}

impl<'a> GqlFieldRenderer<'a> {
    fn render_input_field(&self, input_field: &InputField) -> String {
        format!(
            "{}{}: {}",
            render_description(input_field.description.as_deref(), ""),
            input_field.name,
            input_field.field_type
        )
    }

    fn render_output_field(&self, field: &OutputField, ctx: &RenderContext) -> String {
        let rendered_args: Vec<String> = field.arguments().iter().map(|arg| self.render_argument(arg)).collect();

        let rendered_args = if rendered_args.is_empty() {
            "".into()
        } else if rendered_args.len() > 1 {
            // Multiline - double indent.
            format!(
                "({}\n)",
                rendered_args
                    .into_iter()
                    .map(|arg| format!("\n{}{}", ctx.indent(), arg))
                    .collect::<Vec<String>>()
                    .join("")
            )
        } else {
            // Single line
            format!("({})", rendered_args.join(", "))
        };

        format!(
            "{}{}{}: {}",
            render_description(field.description.as_deref(), ""),
            field.name,
            rendered_args,
            field.field_type
        )
    }

    fn render_argument(&self, arg: &InputField) -> String {
        format!("{}: {}", arg.name, arg.field_type)
    }
}
