//! `todo-service` command line.
//!
//! Boots configuration, logging and metrics, then runs one operation through
//! the full chain:
//!
//! ```text
//! transport logging → endpoint → instrumenting → logging → service → store
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use todo_service::config::load_or_default;
use todo_service::endpoint::{
    name, CreateTodoRequest, EndpointError, EndpointRequest, GetTodoRequest, RequestContext,
    TodoPagesRequest, TodoSearchRequest, UpdateTodoRequest,
};
use todo_service::observability::{self, PrometheusMetrics};
use todo_service::todo::{
    CreateTodoInput, ErrorKind, PaginationInput, TodoSearchInput, TodoStatus, UpdateTodoInput,
};
use todo_service::{build_service, make_endpoints, MemoryStore};

#[derive(Parser)]
#[command(name = "todo-service")]
#[command(about = "Manage todo records through the instrumented service chain", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when it is missing.
    #[arg(short, long, default_value = "todo-service.toml")]
    config: PathBuf,

    /// Identity recorded as creator/updater (defaults to app.operator).
    #[arg(short, long)]
    user: Option<String>,

    /// Print the Prometheus exposition to stderr after the command.
    #[arg(long)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PageArgs {
    /// Records per page
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    count: i64,

    /// 1-based page number
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    page: i64,
}

impl From<PageArgs> for PaginationInput {
    fn from(args: PageArgs) -> Self {
        PaginationInput {
            count: args.count,
            page: args.page,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one todo
    Get { id: String },
    /// List all todos, one page at a time
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Search todos by code, name, creation date or status
    Search {
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Created at or after (RFC 3339)
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Created at or before (RFC 3339)
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        #[arg(long)]
        status: Option<TodoStatus>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a todo
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        start: DateTime<Utc>,
        #[arg(long)]
        end: DateTime<Utc>,
        #[arg(long, default_value = "active")]
        status: TodoStatus,
    },
    /// Change selected fields of a todo
    Update {
        id: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        #[arg(long)]
        status: Option<TodoStatus>,
    },
}

impl Commands {
    /// Endpoint name, JSON payload, and whether the command mutates the store.
    fn into_request(self) -> Result<(&'static str, serde_json::Value, bool), serde_json::Error> {
        Ok(match self {
            Commands::Get { id } => (
                name::GET_TODO,
                serde_json::to_value(GetTodoRequest { id })?,
                false,
            ),
            Commands::List { page } => (
                name::TODO_PAGES,
                serde_json::to_value(TodoPagesRequest {
                    pagination: page.into(),
                })?,
                false,
            ),
            Commands::Search {
                code,
                name: content_name,
                from,
                to,
                status,
                page,
            } => (
                name::TODO_SEARCH,
                serde_json::to_value(TodoSearchRequest {
                    search: TodoSearchInput {
                        content_code: code,
                        content_name,
                        start_date: from,
                        end_date: to,
                        status,
                    },
                    pagination: page.into(),
                })?,
                false,
            ),
            Commands::Create {
                code,
                name: content_name,
                description,
                start,
                end,
                status,
            } => (
                name::CREATE_TODO,
                serde_json::to_value(CreateTodoRequest {
                    input: CreateTodoInput {
                        content_code: code,
                        content_name,
                        description,
                        start_date: start,
                        end_date: end,
                        status,
                    },
                })?,
                true,
            ),
            Commands::Update {
                id,
                code,
                name: content_name,
                description,
                start,
                end,
                status,
            } => (
                name::UPDATE_TODO,
                serde_json::to_value(UpdateTodoRequest {
                    id,
                    input: UpdateTodoInput {
                        content_code: code,
                        content_name,
                        description,
                        start_date: start,
                        end_date: end,
                        status,
                    },
                })?,
                true,
            ),
        })
    }
}

fn exit_code(err: &EndpointError) -> ExitCode {
    match err {
        EndpointError::Decode(_) => ExitCode::from(2),
        EndpointError::Cancelled => ExitCode::from(130),
        EndpointError::Service(e) => match e.kind() {
            ErrorKind::InvalidArgument => ExitCode::from(2),
            ErrorKind::NotFound => ExitCode::from(3),
            ErrorKind::StoreFailure => ExitCode::FAILURE,
        },
        EndpointError::Encode(_) => ExitCode::FAILURE,
    }
}

async fn run() -> Result<ExitCode, Box<dyn Error>> {
    let Cli {
        config: config_path,
        user,
        print_metrics,
        command,
    } = Cli::parse();

    let config = load_or_default(&config_path)?;
    observability::logging::init(&config.observability)?;

    tracing::info!(
        config = %config_path.display(),
        persist = config.store.persist,
        data_file = %config.store.data_file.display(),
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled || print_metrics {
        Some(observability::metrics::install_recorder()?)
    } else {
        None
    };
    let sink = PrometheusMetrics::from_config(&config.observability);
    if metrics_handle.is_some() {
        sink.describe();
    }

    let store = if config.store.persist {
        MemoryStore::load_from_file(&config.store.data_file)?
    } else {
        MemoryStore::default()
    };

    let endpoints = make_endpoints(build_service(store.clone(), Arc::new(sink)));

    let identity = user.unwrap_or_else(|| config.app.operator.clone());
    let (endpoint, payload, mutates) = command.into_request()?;

    let cancellation = CancellationToken::new();
    let interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling request");
            interrupt.cancel();
        }
    });

    let request = EndpointRequest::new(
        RequestContext::with_cancellation(identity, cancellation),
        payload,
    );
    let result = endpoints
        .call(endpoint, request)
        .await
        .ok_or_else(|| format!("unknown endpoint '{}'", endpoint))?;

    let code = match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            if mutates && config.store.persist {
                store.save_to_file()?;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(endpoint, error = %e, "Request failed");
            eprintln!("error: {}", e);
            exit_code(&e)
        }
    };

    if print_metrics {
        if let Some(handle) = &metrics_handle {
            eprintln!("{}", handle.render());
        }
    }

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
