mod enum_renderer;
mod field_renderer;
mod object_renderer;

use cud_schema::*;
use enum_renderer::*;
use field_renderer::*;
use object_renderer::*;
use std::collections::HashSet;

/// Top level GraphQL schema renderer.
struct GqlSchemaRenderer<'a> {
    query_schema: &'a QuerySchema,
}

impl<'a> Renderer for GqlSchemaRenderer<'a> {
    fn render(&self, ctx: &mut RenderContext) -> String {
        let _ = self.query_schema.query().as_renderer().render(ctx);

        // An empty `type Mutation {}` is not valid SDL.
        if !self.query_schema.mutation().get_fields().is_empty() {
            let _ = self.query_schema.mutation().as_renderer().render(ctx);
        }

        for named_type in self.query_schema.types() {
            let _ = named_type.as_renderer().render(ctx);
        }

        String::new()
    }
}

pub fn render_graphql_schema(query_schema: &QuerySchema) -> String {
    let mut context = RenderContext::new();
    GqlSchemaRenderer { query_schema }.render(&mut context);

    let mut rendered = context.format();

    // Custom scalars need a definition for graphql.js implementations.
    for scalar in query_schema.custom_scalars() {
        rendered.push_str(&format!("\n\nscalar {scalar}"));
    }

    rendered
}

trait Renderer {
    fn render(&self, ctx: &mut RenderContext) -> String;
}

struct RenderContext {
    /// Output queue for all (top level) elements that need to be rendered,
    output_queue: Vec<String>,

    /// Prevents double rendering of elements that are referenced multiple times.
    rendered: HashSet<String>,

    /// General indent level in spaces.
    indent: usize,

    /// Indent string.
    indent_str: &'static str,
}

impl RenderContext {
    fn new() -> Self {
        RenderContext {
            output_queue: Default::default(),
            rendered: Default::default(),
            indent: 2,
            indent_str: " ",
        }
    }

    fn format(self) -> String {
        self.output_queue.join("\n\n")
    }

    fn already_rendered(&self, cache_key: &str) -> bool {
        self.rendered.contains(cache_key)
    }

    fn mark_as_rendered(&mut self, cache_key: String) {
        self.rendered.insert(cache_key);
    }

    fn add(&mut self, cache_key: String, output: String) {
        self.output_queue.push(output);
        self.mark_as_rendered(cache_key);
    }

    fn indent(&self) -> String {
        self.indent_str.repeat(self.indent)
    }
}

/// Block string rendering of a description, placed above the described element.
fn render_description(description: Option<&str>, indent: &str) -> String {
    match description {
        Some(description) => format!("{indent}\"\"\"{}\"\"\"\n", description.replace("\"\"\"", "\\\"\"\"")),
        None => String::new(),
    }
}

enum GqlRenderer<'a> {
    Object(GqlObjectRenderer<'a>),
    Field(GqlFieldRenderer<'a>),
    Enum(GqlEnumRenderer<'a>),
}

impl<'a> Renderer for GqlRenderer<'a> {
    fn render(&self, ctx: &mut RenderContext) -> String {
        match self {
            GqlRenderer::Object(o) => o.render(ctx),
            GqlRenderer::Field(f) => f.render(ctx),
            GqlRenderer::Enum(e) => e.render(ctx),
        }
    }
}

trait AsRenderer<'a> {
    fn as_renderer(&self) -> GqlRenderer<'a>;
}

impl<'a> AsRenderer<'a> for &'a NamedType {
    fn as_renderer(&self) -> GqlRenderer<'a> {
        match *self {
            NamedType::InputObject(i) => i.as_renderer(),
            NamedType::Object(o) => o.as_renderer(),
            NamedType::Interface(i) => GqlRenderer::Object(GqlObjectRenderer::Interface(i)),
            NamedType::Enum(e) => e.as_renderer(),
        }
    }
}

impl<'a> AsRenderer<'a> for &'a InputField {
    fn as_renderer(&self) -> GqlRenderer<'a> {
        GqlRenderer::Field(GqlFieldRenderer::Input(*self))
    }
}

impl<'a> AsRenderer<'a> for &'a OutputField {
    fn as_renderer(&self) -> GqlRenderer<'a> {
        GqlRenderer::Field(GqlFieldRenderer::Output(*self))
    }
}

impl<'a> AsRenderer<'a> for &'a EnumType {
    fn as_renderer(&self) -> GqlRenderer<'a> {
        GqlRenderer::Enum(GqlEnumRenderer::new(*self))
    }
}

impl<'a> AsRenderer<'a> for &'a InputObjectType {
    fn as_renderer(&self) -> GqlRenderer<'a> {
        GqlRenderer::Object(GqlObjectRenderer::Input(*self))
    }
}

impl<'a> AsRenderer<'a> for &'a ObjectType {
    fn as_renderer(&self) -> GqlRenderer<'a> {
        GqlRenderer::Object(GqlObjectRenderer::Output(*self))
    }
}
