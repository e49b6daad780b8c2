use std::fmt;
use uuid::Uuid;

/// Request-scoped logging context passed into every workflow call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
  request_id: Uuid,
}

impl RequestContext {
  pub fn new(request_id: Uuid) -> Self {
    Self { request_id }
  }

  /// Context for work that did not originate from a request
  pub fn detached() -> Self {
    Self::new(Uuid::new_v4())
  }

  pub fn request_id(&self) -> Uuid {
    self.request_id
  }

  /// Span carrying the request id for one workflow operation
  pub fn span(&self, operation: &'static str) -> tracing::Span {
    tracing::info_span!("service", request_id = %self.request_id, operation)
  }
}

impl fmt::Display for RequestContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.request_id)
  }
}
