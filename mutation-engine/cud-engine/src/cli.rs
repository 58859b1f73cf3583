use crate::{
    context::EngineContext,
    error::EngineError,
    opt::{EngineOpt, ExecuteOpts, Subcommand},
    EngineResult,
};
use cud_core::{ContextUser, MutationContext};
use cud_value::CudValue;
use indexmap::IndexMap;
use request_handlers::{render_graphql_schema, GraphqlBody};
use serde_json::Value as JsonValue;

pub enum CliCommand {
    Render,
    Execute(ExecuteRequest),
}

pub struct ExecuteRequest {
    body: GraphqlBody,
    seed: Option<JsonValue>,
    ctx: MutationContext,
}

impl CliCommand {
    /// Create a CLI command from an `EngineOpt` instance.
    pub fn from_opt(opts: &EngineOpt) -> EngineResult<CliCommand> {
        match &opts.subcommand {
            Subcommand::Render => Ok(CliCommand::Render),
            Subcommand::Execute(execute) => Ok(CliCommand::Execute(ExecuteRequest::from_opts(execute)?)),
        }
    }

    /// Runs the command and returns what it prints.
    pub async fn execute(self, cx: &EngineContext) -> EngineResult<String> {
        match self {
            CliCommand::Render => Ok(render_graphql_schema(cx.handler().executor().schema().query_schema())),
            CliCommand::Execute(request) => Self::execute_request(request, cx).await,
        }
    }

    async fn execute_request(request: ExecuteRequest, cx: &EngineContext) -> EngineResult<String> {
        if let Some(seed) = &request.seed {
            cx.connector()
                .seed(seed)
                .map_err(|err| EngineError::ConfigurationError(format!("Invalid seed data: {err}")))?;
        }

        let response = cx.handler().handle(request.body, &request.ctx).await;

        Ok(serde_json::to_string(&response)?)
    }
}

impl ExecuteRequest {
    fn from_opts(opts: &ExecuteOpts) -> EngineResult<Self> {
        let variables: IndexMap<String, JsonValue> = match &opts.variables {
            Some(variables) => serde_json::from_str(variables)?,
            None => IndexMap::new(),
        };

        let mut body = GraphqlBody::new(opts.query.clone()).with_variables(variables);

        if let Some(operation_name) = &opts.operation_name {
            body = body.with_operation_name(operation_name.clone());
        }

        let seed = match &opts.seed {
            Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
            None => None,
        };

        Ok(ExecuteRequest {
            body,
            seed,
            ctx: context_for(opts),
        })
    }
}

fn context_for(opts: &ExecuteOpts) -> MutationContext {
    let Some(id) = &opts.user else {
        return MutationContext::anonymous();
    };

    let id = id.parse::<i64>().map(CudValue::from).unwrap_or_else(|_| CudValue::from(id.as_str()));
    let mut user = ContextUser::new(id).with_permissions(opts.permissions.iter().cloned());

    if opts.superuser {
        user = user.superuser();
    }

    MutationContext::for_user(user)
}
