use crate::middleware::authentication::AccessGate;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;

pub struct GateMiddleware<S> {
    pub(super) service: Rc<S>,
    pub(super) access: AccessGate,
}

impl<S, B> Service<ServiceRequest> for GateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.access.authenticate(req.headers()) {
            Ok(identity) => {
                tracing::debug!(subject = identity.subject_id(), "bearer token accepted");
                req.extensions_mut().insert(Arc::new(identity));
                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(reason) => {
                tracing::debug!(path = %req.path(), reason = %reason, "request rejected by access gate");
                Box::pin(async move { Err(reason.into()) })
            }
        }
    }
}
