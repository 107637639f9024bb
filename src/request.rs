//! Single in-flight request bookkeeping.
//!
//! A surface owns one [`RequestSlot`]. Starting a request hands out a fresh
//! [`Ticket`] and aborts whatever was running before; a result is only applied
//! when its ticket is still the current one.

use crate::api::{
    AnalysisApi, AnalyzeReply, AnalyzeRequest, ApiError, ApiResult, QueryReply, QueryRequest,
};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use std::future::Future;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSlot {
    issued: u64,
    current: Option<(Ticket, AbortHandle)>,
}

impl RequestSlot {
    pub fn start(&mut self) -> (Ticket, AbortRegistration) {
        self.cancel();
        self.issued += 1;
        let ticket = Ticket(self.issued);
        let (handle, registration) = AbortHandle::new_pair();
        self.current = Some((ticket, handle));
        (ticket, registration)
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }

    /// Clears the slot if `ticket` is current. Returns whether it was.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        match self.current {
            Some((current, _)) if current == ticket => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        if let Some((ticket, handle)) = self.current.take() {
            tracing::debug!(ticket = ticket.0, "aborting in-flight request");
            handle.abort();
        }
    }
}

/// A request that has passed validation and is waiting to be run.
pub struct Pending<R> {
    pub ticket: Ticket,
    pub request: R,
    registration: AbortRegistration,
}

#[derive(Debug)]
pub struct Settled<T> {
    pub ticket: Ticket,
    pub result: ApiResult<T>,
}

impl<R> Pending<R> {
    pub fn new(ticket: Ticket, request: R, registration: AbortRegistration) -> Self {
        Self {
            ticket,
            request,
            registration,
        }
    }
}

async fn cancellable<T>(
    registration: AbortRegistration,
    call: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    match Abortable::new(call, registration).await {
        Ok(result) => result,
        Err(_aborted) => Err(ApiError::Cancelled),
    }
}

impl Pending<QueryRequest> {
    pub async fn run(self, api: &dyn AnalysisApi) -> Settled<QueryReply> {
        let Pending {
            ticket,
            request,
            registration,
        } = self;
        let result = cancellable(registration, api.query(&request)).await;
        Settled { ticket, result }
    }
}

impl Pending<AnalyzeRequest> {
    pub async fn run(self, api: &dyn AnalysisApi) -> Settled<AnalyzeReply> {
        let Pending {
            ticket,
            request,
            registration,
        } = self;
        let result = cancellable(registration, api.analyze(&request)).await;
        Settled { ticket, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_again_supersedes_previous_ticket() {
        let mut slot = RequestSlot::default();
        let (first, _) = slot.start();
        let (second, _) = slot.start();
        assert_ne!(first, second);
        assert!(!slot.settle(first));
        assert!(slot.is_pending());
        assert!(slot.settle(second));
        assert!(!slot.is_pending());
    }

    #[tokio::test]
    async fn cancel_aborts_the_running_future() {
        let mut slot = RequestSlot::default();
        let (_ticket, registration) = slot.start();
        slot.cancel();
        let result: ApiResult<()> =
            cancellable(registration, futures::future::pending::<ApiResult<()>>()).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert!(!slot.is_pending());
    }
}
