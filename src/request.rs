use crate::backend::{Locator, ObjectSystem, ResultEnumerator, Services};
use crate::result_item::ResultItem;
use crate::status::Status;
use crate::{WMIError, WMIResult};
use log::{debug, trace, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::{mem, slice};

/// The only query language WMI accepts.
pub const QUERY_LANGUAGE: &str = "WQL";

pub const DEFAULT_NAMESPACE: &str = "ROOT\\CIMV2";

/// Asks a running [`QueryRequest`] to stop collecting results.
///
/// The token is checked before each pull from the result enumerator, so a pull that is already
/// waiting for the service is never interrupted. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How the collection of results ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrainOutcome {
    /// The query was never executed, because an earlier setup step failed.
    NotStarted,
    /// The enumerator reported that there are no more results.
    Exhausted,
    /// A pull failed, and the results collected until then were kept.
    Stopped,
    /// The [`CancelToken`] was cancelled.
    Cancelled,
}

/// A query against one WMI namespace, executed in full on construction.
///
/// Construction runs these steps in order: security initialization, locator creation,
/// connection to the namespace, query execution, and collection of every result. A failure to
/// create the locator, connect or execute stops right there, leaving the later handles empty and
/// the status failed. A failed pull while collecting only ends the collection: the results
/// gathered so far are kept and the status is still a success, while
/// [`QueryRequest::drain_outcome`] and [`QueryRequest::enumeration_error`] tell what happened.
///
/// The request owns its handles and results, and releases them once dropped: results first,
/// then the enumerator, the services and finally the locator.
pub struct QueryRequest<S: ObjectSystem> {
    locator: Option<S::Locator>,
    services: Option<S::Services>,
    enumerator: Option<S::Enumerator>,
    results: Vec<ResultItem<S::Object>>,
    status: Status,
    security_status: Status,
    error: Option<WMIError>,
    drain_outcome: DrainOutcome,
    enumeration_error: Option<WMIError>,
}

impl<S: ObjectSystem> QueryRequest<S> {
    /// Run `query` against `namespace` (like [`DEFAULT_NAMESPACE`]).
    ///
    /// This blocks until every result was collected. Use [`QueryRequest::with_cancel`] to be
    /// able to stop early.
    pub fn with_system(system: &S, query: &str, namespace: &str) -> Self {
        Self::with_cancel(system, query, namespace, &CancelToken::new())
    }

    pub fn with_cancel(system: &S, query: &str, namespace: &str, cancel: &CancelToken) -> Self {
        let mut request = Self::empty();

        request.security_status = Status::from(&request.init_security(system));

        let result = request.execute(system, query, namespace, cancel);

        request.status = Status::from(&result);

        if let Err(err) = result {
            debug!("WMI request {:?} failed: {}", query, err);
            request.error = Some(err);
        }

        request
    }

    fn empty() -> Self {
        Self {
            locator: None,
            services: None,
            enumerator: None,
            results: vec![],
            status: Status::default(),
            security_status: Status::default(),
            error: None,
            drain_outcome: DrainOutcome::NotStarted,
            enumeration_error: None,
        }
    }

    fn init_security(&self, system: &S) -> WMIResult<()> {
        debug!("Calling CoInitializeSecurity");

        let result = system.initialize_security();

        // The process may have configured security already, which is fine.
        if let Err(err) = &result {
            warn!("Failed to initialize COM security, continuing: {}", err);
        }

        result
    }

    fn execute(
        &mut self,
        system: &S,
        query: &str,
        namespace: &str,
        cancel: &CancelToken,
    ) -> WMIResult<()> {
        debug!("Calling CoCreateInstance for CLSID_WbemLocator");

        let locator = self.locator.insert(
            system
                .create_locator()
                .map_err(|err| WMIError::LocatorError {
                    source: Box::new(err),
                })?,
        );

        debug!("Calling ConnectServer for {:?}", namespace);

        let services = self.services.insert(locator.connect_server(namespace).map_err(
            |err| WMIError::NamespaceError {
                namespace: namespace.to_string(),
                source: Box::new(err),
            },
        )?);

        debug!("Calling ExecQuery for {:?}", query);

        let enumerator = self.enumerator.insert(
            services
                .exec_query(QUERY_LANGUAGE, query)
                .map_err(|err| WMIError::ExecQueryError {
                    query: query.to_string(),
                    source: Box::new(err),
                })?,
        );

        let (outcome, error) = drain(enumerator, &mut self.results, cancel);

        debug!(
            "Collected {} results, enumeration {:?}",
            self.results.len(),
            outcome
        );

        self.drain_outcome = outcome;
        self.enumeration_error = error;

        Ok(())
    }
}

/// Pull every object out of `enumerator`, one at a time.
fn drain<E: ResultEnumerator>(
    enumerator: &mut E,
    results: &mut Vec<ResultItem<E::Object>>,
    cancel: &CancelToken,
) -> (DrainOutcome, Option<WMIError>) {
    loop {
        if cancel.is_cancelled() {
            warn!("WMI enumeration cancelled after {} results", results.len());
            return (DrainOutcome::Cancelled, None);
        }

        match enumerator.next_object() {
            Ok(Some(object)) => {
                trace!("Got object #{}", results.len());
                results.push(ResultItem::new(object));
            }
            Ok(None) => return (DrainOutcome::Exhausted, None),
            Err(err) => {
                let err = WMIError::EnumerationStopped {
                    collected: results.len(),
                    source: Box::new(err),
                };

                warn!("{}, keeping the partial results", err);

                return (DrainOutcome::Stopped, Some(err));
            }
        }
    }
}

impl<S: ObjectSystem> QueryRequest<S> {
    /// The overall outcome: a success if the query was executed, even if it returned no results.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The outcome of the security initialization, which does not affect [`QueryRequest::status`].
    pub fn security_status(&self) -> &Status {
        &self.security_status
    }

    /// The setup failure behind a failed [`QueryRequest::status`].
    pub fn error(&self) -> Option<&WMIError> {
        self.error.as_ref()
    }

    pub fn drain_outcome(&self) -> DrainOutcome {
        self.drain_outcome
    }

    /// Whether the collection ended before the enumerator ran out of results.
    pub fn stopped_early(&self) -> bool {
        matches!(
            self.drain_outcome,
            DrainOutcome::Stopped | DrainOutcome::Cancelled
        )
    }

    /// The failed pull which ended the collection, if any.
    pub fn enumeration_error(&self) -> Option<&WMIError> {
        self.enumeration_error.as_ref()
    }

    pub fn results(&self) -> &[ResultItem<S::Object>] {
        &self.results
    }

    pub fn iter(&self) -> slice::Iter<'_, ResultItem<S::Object>> {
        self.results.iter()
    }

    /// Take the results out. The handles are released right away.
    pub fn into_results(mut self) -> Vec<ResultItem<S::Object>> {
        mem::take(&mut self.results)
    }

    pub fn locator(&self) -> Option<&S::Locator> {
        self.locator.as_ref()
    }

    pub fn services(&self) -> Option<&S::Services> {
        self.services.as_ref()
    }

    pub fn enumerator(&self) -> Option<&S::Enumerator> {
        self.enumerator.as_ref()
    }

    /// Move the handles and the results into a new request.
    ///
    /// This request keeps a copy of its status and diagnostics, but nothing to release.
    pub fn take(&mut self) -> Self {
        Self {
            locator: self.locator.take(),
            services: self.services.take(),
            enumerator: self.enumerator.take(),
            results: mem::take(&mut self.results),
            status: self.status.clone(),
            security_status: self.security_status.clone(),
            error: self.error.take(),
            drain_outcome: self.drain_outcome,
            enumeration_error: self.enumeration_error.take(),
        }
    }
}

impl<S: ObjectSystem> Drop for QueryRequest<S> {
    fn drop(&mut self) {
        self.results.clear();

        drop(self.enumerator.take());
        drop(self.services.take());
        drop(self.locator.take());
    }
}

impl<'a, S: ObjectSystem> IntoIterator for &'a QueryRequest<S> {
    type Item = &'a ResultItem<S::Object>;
    type IntoIter = slice::Iter<'a, ResultItem<S::Object>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
