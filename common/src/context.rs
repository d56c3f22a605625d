use std::sync::Arc;

use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};
use anyhow::anyhow;
use type_map::concurrent::TypeMap;

use crate::{
    error::{self, InnerError},
    notify::NotifierObject,
    repository::{Entity, RepositoryObject},
};

/// Everything the handlers share. Built once in `main` and handed to every
/// worker through `App::app_data`.
pub struct ServiceState {
    pub repositories: TypeMap,
    pub notifier: NotifierObject,
}

impl ServiceState {
    pub fn new(notifier: NotifierObject) -> Self {
        Self {
            repositories: TypeMap::new(),
            notifier,
        }
    }

    pub fn insert<T: Entity + 'static>(&mut self, repository: RepositoryObject<T>) {
        self.repositories.insert(repository);
    }
}

pub struct Context(pub Arc<ServiceState>);

impl FromRequest for Context {
    type Error = error::Error;

    type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<Data<Arc<ServiceState>>>() {
            Some(state) => Ok(Context(Arc::clone(state))),
            None => Err(InnerError::Internal(anyhow!("No state provided")).into()),
        };
        futures_util::future::ready(result)
    }
}

impl Context {
    pub fn get_repository<T: Entity + 'static>(&self) -> Option<RepositoryObject<T>> {
        self.0.repositories.get::<RepositoryObject<T>>().cloned()
    }

    pub fn try_get_repository<T: Entity + 'static>(&self) -> error::Result<RepositoryObject<T>> {
        self.get_repository::<T>().ok_or_else(|| {
            InnerError::Internal(anyhow!(
                "Repository for type {} not found",
                std::any::type_name::<T>()
            ))
            .into()
        })
    }

    pub fn notifier(&self) -> NotifierObject {
        Arc::clone(&self.0.notifier)
    }
}
