use super::connectivity::{instantiate, ConnectivityChecker};
use super::math::{catalan, factorial};
use super::node::Node;
use super::order::{generate_orders, Order};
use super::registry::{JoinConditionSet, TableId, TableRegistry};
use super::template::generate_templates;
use crate::config::EnumeratorConfig;
use crate::{Error, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Beyond this many relations a run takes impractically long. Larger graphs
/// are still enumerated, only a warning is logged.
pub const PRACTICAL_INPUT_LIMIT: usize = 8;

/// Progress events emitted per run when `log_progress` is enabled.
const PROGRESS_REPORTS: usize = 10;

/// Counts bushy join trees free of cross products.
///
/// Every parenthesization of the registered relations is combined with every
/// order of leaves, giving `n! * Catalan(n - 1)` candidate trees. Each candidate
/// is checked independently on the worker pool and all joins are assumed to be
/// inner joins.
///
/// For the chain A-B-C the two shapes `(T1xT2)xT3` and `T1x(T2xT3)` combined with
/// the six leaf orders give 12 trees, of which `(AB)C, A(BC), A(CB), (BA)C,
/// (BC)A, C(AB), (CB)A, C(BA)` are free of cross products: the count is 8.
#[derive(Debug)]
pub struct JoinEnumerator {
    tables: TableRegistry,
    conditions: JoinConditionSet,
    config: EnumeratorConfig,
    pool: WorkerPool,
    #[cfg(test)]
    fail_workers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationStats {
    pub inputs: usize,
    pub orders: u64,
    pub templates: u64,
    pub pairs_evaluated: u64,
    pub cross_product_free: u64,
    pub cached_input_sets: usize,
    pub cached_verdicts: usize,
    pub progress_reports: u64,
    pub elapsed_ms: u64,
}

/// Counts finished leaf orders and logs every `step` of them.
struct ProgressTracker {
    total: usize,
    step: usize,
    enabled: bool,
    completed: AtomicUsize,
    reports: AtomicU64,
}

impl ProgressTracker {
    fn new(total: usize, enabled: bool) -> Self {
        Self {
            total,
            step: total.div_ceil(PROGRESS_REPORTS).max(1),
            enabled,
            completed: AtomicUsize::new(0),
            reports: AtomicU64::new(0),
        }
    }

    fn order_completed(&self, found: &AtomicU64) {
        let completed = self.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if self.enabled && (completed % self.step == 0 || completed == self.total) {
            self.reports.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                completed_orders = completed,
                total_orders = self.total,
                found_so_far = found.load(Ordering::Relaxed),
                "Join enumeration progress"
            );
        }
    }

    fn reports(&self) -> u64 {
        self.reports.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
enum WorkerPool {
    /// rayon's global pool, sized to the available parallelism
    Global,
    Dedicated(Arc<rayon::ThreadPool>),
}

impl WorkerPool {
    fn from_config(config: &EnumeratorConfig) -> Result<Self> {
        match config.worker_threads {
            None => Ok(WorkerPool::Global),
            Some(threads) => {
                let prefix = config.thread_name_prefix.clone();
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(move |i| format!("{}-{}", prefix, i))
                    .build()?;
                Ok(WorkerPool::Dedicated(Arc::new(pool)))
            }
        }
    }

    fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match self {
            WorkerPool::Global => op(),
            WorkerPool::Dedicated(pool) => pool.install(op),
        }
    }
}

impl Default for JoinEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl JoinEnumerator {
    pub fn new() -> Self {
        Self {
            tables: TableRegistry::new(),
            conditions: JoinConditionSet::new(),
            config: EnumeratorConfig::default(),
            pool: WorkerPool::Global,
            #[cfg(test)]
            fail_workers: false,
        }
    }

    pub fn with_config(config: EnumeratorConfig) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::from_config(&config)?;
        Ok(Self {
            tables: TableRegistry::new(),
            conditions: JoinConditionSet::new(),
            config,
            pool,
            #[cfg(test)]
            fail_workers: false,
        })
    }

    pub fn config(&self) -> &EnumeratorConfig {
        &self.config
    }

    /// Register a join condition between two tables, registering either name
    /// on first sight.
    pub fn add_join_condition(&mut self, table1: &str, table2: &str) -> Result<()> {
        if table1.is_empty() || table2.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "Join condition needs two table names, got {:?} and {:?}",
                table1, table2
            )));
        }

        let first = self.tables.resolve(table1)?;
        let second = self.tables.resolve(table2)?;
        self.conditions.insert(first, second);
        Ok(())
    }

    /// Register a table without any join condition.
    pub fn add_table(&mut self, table: &str) -> Result<TableId> {
        self.tables.resolve(table)
    }

    /// Number of distinct registered tables.
    pub fn input_count(&self) -> usize {
        self.tables.len()
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    pub fn table_names(&self) -> &[String] {
        self.tables.names()
    }

    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.tables.get(name)
    }

    pub fn has_join_condition(&self, table1: &str, table2: &str) -> bool {
        match (self.tables.get(table1), self.tables.get(table2)) {
            (Some(a), Some(b)) => self.conditions.contains(a, b),
            _ => false,
        }
    }

    /// Parenthesization templates for the registered tables.
    pub fn templates(&self) -> Vec<Node> {
        generate_templates(self.input_count())
    }

    /// Leaf orders for the registered tables.
    pub fn orders(&self) -> Vec<Order> {
        generate_orders(self.input_count())
    }

    /// Count cross-product free join trees for the registered join graph.
    pub fn count(&self) -> Result<u64> {
        Ok(self.count_with_stats()?.cross_product_free)
    }

    pub fn count_with_stats(&self) -> Result<EnumerationStats> {
        let started = Instant::now();
        let inputs = self.input_count();

        if inputs <= 1 {
            // A single relation is one trivial plan; an empty graph has none.
            return Ok(EnumerationStats {
                inputs,
                orders: inputs as u64,
                templates: inputs as u64,
                pairs_evaluated: 0,
                cross_product_free: inputs as u64,
                cached_input_sets: 0,
                cached_verdicts: 0,
                progress_reports: 0,
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }

        if inputs > PRACTICAL_INPUT_LIMIT {
            tracing::warn!(
                inputs,
                limit = PRACTICAL_INPUT_LIMIT,
                "Exhaustive enumeration beyond the practical input limit"
            );
        }

        let orders = generate_orders(inputs);
        let templates = generate_templates(inputs);
        tracing::debug!(
            inputs,
            orders = orders.len(),
            templates = templates.len(),
            "Generated search space"
        );

        if self.config.verify_search_space {
            verify_size("leaf orders", factorial(inputs as u64), orders.len())?;
            verify_size("join templates", catalan(inputs as u64 - 1), templates.len())?;
        }

        let pairs = orders.len() as u64 * templates.len() as u64;
        tracing::info!(
            inputs,
            conditions = self.conditions.len(),
            pairs,
            "Starting join enumeration"
        );

        // Memo caches live for this run only.
        let checker = ConnectivityChecker::new(&self.conditions);
        let counter = AtomicU64::new(0);
        let progress = ProgressTracker::new(orders.len(), self.config.log_progress);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                orders.par_iter().try_for_each(|order| {
                    templates.par_iter().try_for_each(|template| {
                        #[cfg(test)]
                        {
                            if self.fail_workers {
                                panic!("worker failed on order {:?}", order.as_slice());
                            }
                        }

                        let tree = instantiate(template, order)?;
                        if checker.is_cross_product_free(&tree)? {
                            counter.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok::<(), Error>(())
                    })?;
                    progress.order_completed(&counter);
                    Ok::<(), Error>(())
                })
            })
        }));

        match outcome {
            Ok(result) => result?,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(error = %message, "Join enumeration worker panicked");
                return Err(Error::ThreadPanic(message));
            }
        }

        let stats = EnumerationStats {
            inputs,
            orders: orders.len() as u64,
            templates: templates.len() as u64,
            pairs_evaluated: pairs,
            cross_product_free: counter.load(Ordering::SeqCst),
            cached_input_sets: checker.cached_input_sets(),
            cached_verdicts: checker.cached_verdicts(),
            progress_reports: progress.reports(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        tracing::debug!(
            cached_input_sets = stats.cached_input_sets,
            cached_verdicts = stats.cached_verdicts,
            "Memo cache sizes"
        );
        tracing::info!(
            inputs,
            count = stats.cross_product_free,
            duration_ms = stats.elapsed_ms,
            "Join enumeration completed"
        );

        Ok(stats)
    }
}

fn verify_size(what: &str, expected: u64, actual: usize) -> Result<()> {
    if expected != actual as u64 {
        return Err(Error::SearchSpaceMismatch {
            what: what.to_string(),
            expected,
            actual: actual as u64,
        });
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
