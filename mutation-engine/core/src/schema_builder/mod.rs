//! Schema builder. Turns registered model types and mutation options into the query
//! schema, the mutation definitions the executor interprets and the bindings between
//! generated input fields and model fields.
//!
//! Input objects are cached by name while they are built. Nested inputs are named after
//! the input they are nested in, so recursion through relation extras always terminates
//! at the depth of the configuration.

mod bindings;
mod filter_inputs;
mod input_types;
mod mutation_type;
mod output_types;
mod query_type;

pub use bindings::*;

use crate::{
    CoreError, CoreResult, DefaultHooks, EngineConfig, ModelTypeOptions, MutationHooks, MutationOptions,
    TypeRegistry,
};
use cud_models::{InternalDataModelRef, ModelRef};
use cud_schema::{
    to_camel_case, EnumType, IdentifierType, InputObjectType, NamedType, ObjectType, QuerySchema, QuerySchemaRef,
};
use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// A generated mutation: its options, the schema names derived from them and the hooks
/// driving its lifecycle.
pub struct MutationDefinition {
    pub options: MutationOptions,
    pub model: ModelRef,
    /// Name of the object type exposing the model.
    pub type_name: String,
    /// The object type encodes its ids as global ids.
    pub global_id: bool,
    pub field_name: String,
    pub payload_name: String,
    /// Data input type, for kinds writing fields.
    pub input_type: Option<String>,
    /// Filter input type of filter mutations.
    pub filter_type: Option<String>,
    pub hooks: Arc<dyn MutationHooks>,
}

impl fmt::Debug for MutationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDefinition")
            .field("field_name", &self.field_name)
            .field("kind", &self.options.kind)
            .field("model", &self.model.name)
            .field("payload_name", &self.payload_name)
            .field("input_type", &self.input_type)
            .field("filter_type", &self.filter_type)
            .finish()
    }
}

/// The built schema and everything needed to execute against it.
#[derive(Debug)]
pub struct CudSchema {
    query_schema: QuerySchemaRef,
    internal_data_model: InternalDataModelRef,
    registry: TypeRegistry,
    mutations: IndexMap<String, MutationDefinition>,
    input_bindings: IndexMap<String, InputBinding>,
    filter_bindings: IndexMap<String, FilterBinding>,
    auto_camelcase: bool,
}

impl CudSchema {
    pub fn query_schema(&self) -> &QuerySchemaRef {
        &self.query_schema
    }

    pub fn internal_data_model(&self) -> &InternalDataModelRef {
        &self.internal_data_model
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The definition behind a root mutation field.
    pub fn mutation(&self, field_name: &str) -> Option<&MutationDefinition> {
        self.mutations.get(field_name)
    }

    pub fn mutations(&self) -> impl Iterator<Item = &MutationDefinition> {
        self.mutations.values()
    }

    pub fn input_binding(&self, type_name: &str) -> Option<&InputBinding> {
        self.input_bindings.get(type_name)
    }

    pub fn filter_binding(&self, type_name: &str) -> Option<&FilterBinding> {
        self.filter_bindings.get(type_name)
    }

    pub fn auto_camelcase(&self) -> bool {
        self.auto_camelcase
    }
}

pub struct SchemaBuilder {
    registry: TypeRegistry,
    mutations: Vec<(MutationOptions, Arc<dyn MutationHooks>)>,
    auto_camelcase: bool,
}

impl SchemaBuilder {
    pub fn new(internal_data_model: InternalDataModelRef) -> Self {
        SchemaBuilder {
            registry: TypeRegistry::new(internal_data_model),
            mutations: Vec::new(),
            auto_camelcase: true,
        }
    }

    /// A builder with the configured types and mutations. Mutations use the default hooks.
    pub fn from_config(internal_data_model: InternalDataModelRef, config: &EngineConfig) -> CoreResult<Self> {
        let mut builder = SchemaBuilder::new(internal_data_model).auto_camelcase(config.auto_camelcase);

        for typ in &config.types {
            builder.register_type(typ.clone())?;
        }

        for options in config.mutation_options() {
            builder.mutation(options);
        }

        Ok(builder)
    }

    pub fn auto_camelcase(mut self, auto_camelcase: bool) -> Self {
        self.auto_camelcase = auto_camelcase;
        self
    }

    pub fn register_type(&mut self, options: ModelTypeOptions) -> CoreResult<()> {
        self.registry.register(options)
    }

    pub fn mutation(&mut self, options: MutationOptions) {
        self.mutation_with_hooks(options, Arc::new(DefaultHooks));
    }

    pub fn mutation_with_hooks(&mut self, options: MutationOptions, hooks: Arc<dyn MutationHooks>) {
        self.mutations.push((options, hooks));
    }

    #[tracing::instrument(skip_all)]
    pub fn build(self) -> CoreResult<CudSchema> {
        let SchemaBuilder {
            registry,
            mutations,
            auto_camelcase,
        } = self;

        let internal_data_model = registry.internal_data_model().clone();
        let mut ctx = BuilderContext::new(&registry, auto_camelcase);

        output_types::initialize_model_object_types(&mut ctx)?;

        let mut definitions = IndexMap::new();
        let mut mutation_fields = Vec::with_capacity(mutations.len());

        for (options, hooks) in mutations {
            let field_name = options.field_name(auto_camelcase);

            if definitions.contains_key(&field_name) {
                return Err(CoreError::configuration(format!(
                    "The mutation field {field_name} is defined twice."
                )));
            }

            let (field, definition) = mutation_type::build_mutation(&mut ctx, options, hooks)?;

            mutation_fields.push(field);
            definitions.insert(definition.field_name.clone(), definition);
        }

        ctx.verify_bindings(definitions.values())?;

        let query = query_type::build(&ctx);
        let mutation = ObjectType::new(IdentifierType::Mutation, mutation_fields);

        let BuilderContext {
            cache,
            input_bindings,
            filter_bindings,
            ..
        } = ctx;

        let query_schema = QuerySchema::new(query, mutation, cache.collect_types())?;

        tracing::debug!(
            mutations = definitions.len(),
            types = query_schema.types().count(),
            "built mutation schema"
        );

        Ok(CudSchema {
            query_schema: Arc::new(query_schema),
            internal_data_model,
            registry,
            mutations: definitions,
            input_bindings,
            filter_bindings,
            auto_camelcase,
        })
    }
}

pub(crate) struct BuilderContext<'a> {
    registry: &'a TypeRegistry,
    auto_camelcase: bool,
    cache: TypeCache,
    input_bindings: IndexMap<String, InputBinding>,
    filter_bindings: IndexMap<String, FilterBinding>,
}

impl<'a> BuilderContext<'a> {
    fn new(registry: &'a TypeRegistry, auto_camelcase: bool) -> Self {
        BuilderContext {
            registry,
            auto_camelcase,
            cache: TypeCache::default(),
            input_bindings: IndexMap::new(),
            filter_bindings: IndexMap::new(),
        }
    }

    /// GraphQL name of a model field or payload entry.
    pub fn graphql_name(&self, name: &str) -> String {
        if self.auto_camelcase {
            to_camel_case(name)
        } else {
            name.to_owned()
        }
    }

    pub fn internal_data_model(&self) -> &InternalDataModelRef {
        self.registry.internal_data_model()
    }

    /// Fails unless the name is free, then reserves it for an input object being built.
    pub fn reserve_input_type(&mut self, name: &str) -> CoreResult<()> {
        if self.cache.input_types.contains_key(name) || self.cache.objects.contains_key(name) {
            return Err(CoreError::configuration(format!(
                "The input type {name} is generated twice. Use `typeName` to tell them apart."
            )));
        }

        self.cache
            .input_types
            .insert(name.to_owned(), InputObjectType::new(IdentifierType::Raw(name.to_owned()), vec![]));

        Ok(())
    }

    pub fn cache_input_type(&mut self, input: InputObjectType) {
        self.cache.input_types.insert(input.name(), input);
    }

    pub fn cache_object_type(&mut self, object: ObjectType) -> CoreResult<()> {
        let name = object.name();

        if self.cache.objects.contains_key(&name) || self.cache.input_types.contains_key(&name) {
            return Err(CoreError::configuration(format!("The type name {name} is used twice.")));
        }

        self.cache.objects.insert(name, object);
        Ok(())
    }

    pub fn cache_interface(&mut self, interface: ObjectType) {
        self.cache.interfaces.insert(interface.name(), interface);
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumType> {
        self.cache.enums.get(name)
    }

    pub fn cache_enum(&mut self, enum_type: EnumType) {
        self.cache.enums.insert(enum_type.name(), enum_type);
    }

    pub fn bind_input(&mut self, name: String, binding: InputBinding) {
        self.input_bindings.insert(name, binding);
    }

    pub fn bind_filter(&mut self, name: String, binding: FilterBinding) {
        self.filter_bindings.insert(name, binding);
    }

    /// Checks the references between generated inputs once every mutation is built:
    /// reused and named input types must exist and belong to the expected model.
    fn verify_bindings<'d>(&self, definitions: impl Iterator<Item = &'d MutationDefinition>) -> CoreResult<()> {
        for definition in definitions {
            if let Some(input_type) = &definition.input_type {
                self.expect_binding(input_type, &definition.model.name)?;
            }

            if let Some(filter_type) = &definition.filter_type {
                match self.filter_bindings.get(filter_type) {
                    Some(binding) if binding.model.name == definition.model.name => (),
                    _ => {
                        return Err(CoreError::configuration(format!(
                            "The filter input {} does not filter {} records.",
                            filter_type, definition.model.name
                        )))
                    }
                }
            }
        }

        for binding in self.input_bindings.values() {
            for field in binding.fields.values() {
                if let (Some(nested), Some(relation)) = (field.nested_type(), field.relation_field(&binding.model)) {
                    self.expect_binding(nested, &relation.related_model)?;
                }
            }
        }

        Ok(())
    }

    fn expect_binding(&self, type_name: &str, model: &str) -> CoreResult<()> {
        match self.input_bindings.get(type_name) {
            Some(binding) if binding.model.name == model => Ok(()),
            Some(binding) => Err(CoreError::configuration(format!(
                "The input type {} writes {} records, expected {}.",
                type_name, binding.model.name, model
            ))),
            None => Err(CoreError::configuration(format!(
                "The input type {type_name} is not generated by any mutation."
            ))),
        }
    }
}

#[derive(Debug, Default)]
struct TypeCache {
    interfaces: IndexMap<String, ObjectType>,
    enums: IndexMap<String, EnumType>,
    objects: IndexMap<String, ObjectType>,
    input_types: IndexMap<String, InputObjectType>,
}

impl TypeCache {
    /// Consumes the cache into the named types of the query schema, in definition order.
    fn collect_types(self) -> Vec<NamedType> {
        self.interfaces
            .into_values()
            .map(NamedType::Interface)
            .chain(self.enums.into_values().map(NamedType::Enum))
            .chain(self.objects.into_values().map(NamedType::Object))
            .chain(self.input_types.into_values().map(NamedType::InputObject))
            .collect()
    }
}
