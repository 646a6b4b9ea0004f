//! ties the fetcher, classifier, parsers and assembler together
//!
//! requests are deduplicated per transaction id: while a fetch is in flight every caller asking for
//! the same id awaits the same shared future. the in-flight map only holds weak handles, so once
//! every caller gave up the fetch is dropped along with its map entry, and the next request starts
//! a new one. completed entities are written to the store and served from there afterwards.
use {
    crate::{
        assembler::{assemble, EntityState, ParsedTransactionEntity},
        error::ParseFailure,
        fetcher::TransactionSource,
        parsers,
        programs::ProgramTable,
        types::{BalanceSlot, RawTransactionRecord},
    },
    futures::future::{BoxFuture, FutureExt, Shared, WeakShared},
    parking_lot::Mutex,
    std::{collections::HashMap, sync::Arc},
    store::MemoryStore,
};

pub type EntityStore = MemoryStore<Arc<ParsedTransactionEntity>>;

type EntityFuture = BoxFuture<'static, Result<Arc<ParsedTransactionEntity>, ParseFailure>>;

type InFlightMap = Arc<Mutex<HashMap<String, InFlight>>>;

struct InFlight {
    handle: WeakShared<EntityFuture>,
    state: Arc<Mutex<EntityState>>,
}

/// owned by the fetch future, removes its in-flight entry once the fetch completes or every
/// caller dropped it
///
/// the in-flight lock must never be held while a strong handle could be dropped
struct InFlightGuard {
    in_flight: InFlightMap,
    id: String,
    state: Arc<Mutex<EntityState>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        // a newer fetch may have replaced this one after it was abandoned
        if in_flight
            .get(&self.id)
            .is_some_and(|in_flight| Arc::ptr_eq(&in_flight.state, &self.state))
        {
            in_flight.remove(&self.id);
        }
    }
}

/// classifies and parses an already fetched record
pub fn parse_transaction(
    programs: &ProgramTable,
    id: &str,
    raw: RawTransactionRecord,
) -> ParsedTransactionEntity {
    let classification = programs.classify(&raw.instructions, &raw.account_keys);
    log::debug!("classified tx({id}) as {:?}", classification.kind);
    let outcome = parsers::parse(&raw, &classification);
    assemble(id, raw, classification, outcome)
}

pub struct Pipeline<S> {
    source: Arc<S>,
    programs: Arc<ProgramTable>,
    store: Arc<EntityStore>,
    in_flight: InFlightMap,
}

impl<S> Clone for Pipeline<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            programs: self.programs.clone(),
            store: self.store.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<S: TransactionSource + 'static> Pipeline<S> {
    pub fn new(source: S, programs: ProgramTable) -> Self {
        Self::with_store(source, programs, Arc::new(EntityStore::new()))
    }
    pub fn with_store(source: S, programs: ProgramTable, store: Arc<EntityStore>) -> Self {
        Self {
            source: Arc::new(source),
            programs: Arc::new(programs),
            store,
            in_flight: Default::default(),
        }
    }
    pub fn source(&self) -> &S {
        &self.source
    }
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }
    /// returns the entity for `id`, fetching it unless it is already stored
    ///
    /// # Returns
    ///
    /// `Err(ParseFailure::Fetch)` when the record could not be retrieved, parse failures are
    /// reported through the returned entity
    pub async fn get(&self, id: &str) -> Result<Arc<ParsedTransactionEntity>, ParseFailure> {
        if let Some(entity) = self.store.get(id) {
            return Ok(entity);
        }
        let fetch = self.attach(id);
        fetch.await
    }
    /// drops the stored entity and fetches it again
    pub async fn refetch(&self, id: &str) -> Result<Arc<ParsedTransactionEntity>, ParseFailure> {
        if self.store.remove(id).is_some() {
            log::debug!("refetching tx({id})");
        }
        let fetch = self.attach(id);
        fetch.await
    }
    pub fn state(&self, id: &str) -> EntityState {
        if let Some(entity) = self.store.get(id) {
            return entity.state();
        }
        let state = self
            .in_flight
            .lock()
            .get(id)
            .map(|in_flight| in_flight.state.clone());
        match state {
            Some(state) => *state.lock(),
            None => EntityState::Requested,
        }
    }
    /// stored entity, or a placeholder describing where the request currently is
    pub fn peek(&self, id: &str) -> Arc<ParsedTransactionEntity> {
        if let Some(entity) = self.store.get(id) {
            return entity;
        }
        match self.state(id) {
            EntityState::Loading => Arc::new(ParsedTransactionEntity::loading(id)),
            _ => Arc::new(ParsedTransactionEntity::requested(id)),
        }
    }
    /// number of fetches that still have at least one caller waiting on them, abandoned fetches
    /// are removed as soon as their last caller is dropped
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn attach(&self, id: &str) -> Shared<EntityFuture> {
        let mut in_flight = self.in_flight.lock();
        // the fetch may have completed between the store lookup and acquiring the lock
        if let Some(entity) = self.store.get(id) {
            return futures::future::ready(Ok(entity)).boxed().shared();
        }
        if let Some(handle) = in_flight.get(id).and_then(|in_flight| in_flight.handle.upgrade()) {
            log::debug!("attaching to in-flight fetch for tx({id})");
            return handle;
        }

        let state = Arc::new(Mutex::new(EntityState::Requested));
        let fetch = {
            let pipeline = self.clone();
            let guard = InFlightGuard {
                in_flight: self.in_flight.clone(),
                id: id.to_string(),
                state: state.clone(),
            };
            async move {
                let result = pipeline.run(&guard.id, &guard.state).await;
                drop(guard);
                result
            }
            .boxed()
            .shared()
        };
        if let Some(handle) = fetch.downgrade() {
            in_flight.insert(id.to_string(), InFlight { handle, state });
        }
        fetch
    }

    async fn run(
        &self,
        id: &str,
        state: &Mutex<EntityState>,
    ) -> Result<Arc<ParsedTransactionEntity>, ParseFailure> {
        *state.lock() = EntityState::Loading;
        let result = self
            .fetch(id)
            .await
            .map(|raw| Arc::new(parse_transaction(&self.programs, id, raw)));
        match &result {
            Ok(entity) => {
                *state.lock() = entity.state();
                self.store.insert(id, entity.clone());
            }
            Err(err) => {
                log::warn!("failed to fetch tx({id}) {err}");
                *state.lock() = EntityState::Requested;
            }
        }
        result
    }

    async fn fetch(&self, id: &str) -> Result<RawTransactionRecord, ParseFailure> {
        let mut raw = self.source.fetch_transaction(id).await?;
        if raw.pre_token_balances.is_none() || raw.post_token_balances.is_none() {
            let (pre, post) = futures::try_join!(
                self.source
                    .fetch_account_balances(&raw.account_keys, BalanceSlot::Pre),
                self.source
                    .fetch_account_balances(&raw.account_keys, BalanceSlot::Post),
            )?;
            if raw.pre_token_balances.is_none() {
                raw.pre_token_balances = pre;
            }
            if raw.post_token_balances.is_none() {
                raw.post_token_balances = post;
            }
        }
        raw.check_bounds();
        Ok(raw)
    }
}
