//! Simulated server state exposed through the registry.
//!
//! The process-level entries read from [`ServerState`]; the `workers` object
//! synthesizes one child per [`WorkerRecord`] and hands that record to the
//! child as its context, so a single schema serves every worker.

use std::any::Any;
use std::sync::Arc;

use statree_registry::{
    from_fn, object_handler, object_iterate, Candidate, Context, Entry, EntryHandler, Handler,
    QueryContext, QueryError, QueryResult, TemplateEntry, TypedField,
};
use statree_types::Value;

pub struct ServerState {
    pub version: String,
    pub pid: String,
    pub workers: Vec<WorkerRecord>,
}

pub struct WorkerRecord {
    pub pid: String,
    pub state: String,
    pub connections: String,
}

impl ServerState {
    /// A state with `workers` running workers.
    pub fn simulated(workers: usize) -> Self {
        let base = std::process::id();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            pid: base.to_string(),
            workers: (0..workers)
                .map(|i| WorkerRecord {
                    pid: (base as usize + i + 1).to_string(),
                    state: "running".into(),
                    connections: (i * 3).to_string(),
                })
                .collect(),
        }
    }
}

static SERVER_VERSION: TypedField<ServerState> = TypedField::new(|s| s.version.as_str());
static SERVER_PID: TypedField<ServerState> = TypedField::new(|s| s.pid.as_str());

static WORKER_PID: TypedField<WorkerRecord> = TypedField::new(|w| w.pid.as_str());
static WORKER_STATE: TypedField<WorkerRecord> = TypedField::new(|w| w.state.as_str());
static WORKER_CONNECTIONS: TypedField<WorkerRecord> =
    TypedField::new(|w| w.connections.as_str());

static SERVER_ENTRIES: [TemplateEntry; 2] = [
    TemplateEntry::field("version", &SERVER_VERSION),
    TemplateEntry::field("pid", &SERVER_PID),
];

/// `/status/server`: fields of the [`ServerState`] passed to the query.
pub static SERVER_TEMPLATE: TemplateEntry = TemplateEntry::object("server", &SERVER_ENTRIES);

static WORKER_ENTRIES: [TemplateEntry; 3] = [
    TemplateEntry::field("pid", &WORKER_PID),
    TemplateEntry::field("state", &WORKER_STATE),
    TemplateEntry::field("connections", &WORKER_CONNECTIONS),
];

/// The fields of one worker, copied once and shared by every synthesized
/// worker entry.
struct WorkerSchema(Vec<Entry>);

impl EntryHandler for WorkerSchema {
    fn handle(&self, query: &mut QueryContext<'_>, ctx: Context<'_>) -> QueryResult<Value> {
        object_handler(&self.0, query, ctx)
    }
}

/// Lists the workers of the [`ServerState`] in the query context, named by
/// their index.
pub struct WorkersHandler {
    schema: Arc<dyn EntryHandler>,
}

impl WorkersHandler {
    pub fn new() -> Self {
        let fields = WORKER_ENTRIES.iter().map(TemplateEntry::to_entry).collect();
        Self {
            schema: Arc::new(WorkerSchema(fields)),
        }
    }

    pub fn entry() -> Entry {
        Entry::custom("workers", Self::new())
    }

    /// The synthesized entry for worker `index`. Only the name is allocated.
    fn worker(&self, index: usize) -> Entry {
        Entry::new(index.to_string(), Handler::Custom(Arc::clone(&self.schema)))
    }
}

impl Default for WorkersHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryHandler for WorkersHandler {
    fn handle(&self, query: &mut QueryContext<'_>, ctx: Context<'_>) -> QueryResult<Value> {
        let state = ctx
            .and_then(|c| c.downcast_ref::<ServerState>())
            .ok_or_else(|| QueryError::ContextMismatch {
                entry: "workers".into(),
            })?;

        let mut workers = state.workers.iter().enumerate();
        let mut iter = from_fn(|_query| {
            Ok(workers.next().map(|(i, worker)| {
                Candidate::owned(self.worker(i), Some(worker as &dyn Any))
            }))
        });

        object_iterate(&mut iter, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statree_registry::Registry;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("/status", Entry::custom("workers", WorkersHandler::default()))
            .unwrap();
        registry
    }

    #[test]
    fn workers_share_one_schema() {
        let handler = WorkersHandler::new();
        let a = handler.worker(0);
        let b = handler.worker(1);
        match (a.handler(), b.handler()) {
            (Handler::Custom(x), Handler::Custom(y)) => assert!(Arc::ptr_eq(x, y)),
            other => panic!("expected shared custom handlers, got: {other:?}"),
        }
        assert_eq!(Arc::strong_count(&handler.schema), 3);
    }

    #[test]
    fn worker_fields_read_their_own_record() {
        let registry = registry();
        let state = ServerState::simulated(3);

        let value = registry.resolve_with("/status/workers", &state).unwrap();
        let workers = value.as_object().unwrap();
        assert_eq!(workers.keys().collect::<Vec<_>>(), vec!["0", "1", "2"]);
        assert_eq!(
            value.get("/2/connections").and_then(Value::as_str),
            Some("6")
        );
        assert_eq!(
            registry.resolve_with("/status/workers/1/pid", &state).unwrap(),
            Value::string(state.workers[1].pid.as_str())
        );
    }

    #[test]
    fn workers_require_server_state() {
        let registry = registry();
        let err = registry.resolve("/status/workers").unwrap_err();
        assert!(matches!(err, QueryError::ContextMismatch { ref entry } if entry == "workers"));
    }
}
