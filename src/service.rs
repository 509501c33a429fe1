//! Typed per-resource services and the account facade.

use http::{Method, StatusCode};
use std::fmt;
use std::marker::PhantomData;

use crate::api::decode_error;
use crate::classify::classify;
use crate::metadata::RequestMetadata;
use crate::resources::{Account, Client, DayEntry, Invoice, Project, Task, TaskAssignment, User};
use crate::{Api, Endpoint, Params, Resource, Result, Toggle};

const WHO_AM_I_PATH: &str = "account/who_am_i";

/// An [`Endpoint`] fixed to one resource type.
pub struct Service<T> {
    endpoint: Endpoint,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for Service<T> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Service<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("path", &self.endpoint.path())
            .field("resource", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Resource> Service<T> {
    pub fn new(api: &Api, path: impl Into<String>) -> Self {
        Self {
            endpoint: api.endpoint(path),
            _resource: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        self.endpoint.path()
    }

    pub async fn all(&self, params: Option<&Params>) -> Result<Vec<T>> {
        self.endpoint.all(params).await
    }

    pub async fn find(&self, id: u64, params: Option<&Params>) -> Result<T> {
        self.endpoint.find(id, params).await
    }

    /// Creates `resource` and returns its new id, which is also stored on it.
    pub async fn create(&self, resource: &mut T) -> Result<u64> {
        self.endpoint.create(resource).await
    }

    pub async fn update(&self, resource: &T) -> Result<()> {
        self.endpoint.update(resource).await
    }

    pub async fn delete(&self, resource: &T) -> Result<()> {
        self.endpoint.delete(resource).await
    }
}

impl<T: Toggle> Service<T> {
    /// Archives or reactivates `resource`, returning its new active state.
    pub async fn toggle(&self, resource: &mut T) -> Result<bool> {
        self.endpoint.toggle(resource).await
    }
}

/// Entry point to one Harvest account.
///
/// ```no_run
/// use harvest::{Api, Harvest, Params, ShortDate, Timeframe};
///
/// # async fn example() -> Result<(), harvest::Error> {
/// let harvest = Harvest::new(Api::builder().subdomain("acme")?.build()?);
///
/// let mut params = Params::new();
/// params.for_timeframe(&Timeframe::since(ShortDate::from_ymd(2014, 2, 1).unwrap()));
/// let entries = harvest.day_entries(42).all(Some(&params)).await?;
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Harvest {
    api: Api,
}

impl Harvest {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn users(&self) -> Service<User> {
        Service::new(&self.api, "people")
    }

    pub fn projects(&self) -> Service<Project> {
        Service::new(&self.api, "projects")
    }

    pub fn clients(&self) -> Service<Client> {
        Service::new(&self.api, "clients")
    }

    pub fn tasks(&self) -> Service<Task> {
        Service::new(&self.api, "tasks")
    }

    pub fn invoices(&self) -> Service<Invoice> {
        Service::new(&self.api, "invoices")
    }

    /// Time entries logged against one project.
    pub fn day_entries(&self, project_id: u64) -> Service<DayEntry> {
        Service::new(&self.api, format!("projects/{}/entries", project_id))
    }

    /// Tasks assigned to one project.
    pub fn task_assignments(&self, project_id: u64) -> Service<TaskAssignment> {
        Service::new(&self.api, format!("projects/{}/task_assignments", project_id))
    }

    /// Fetches the authenticated user and their company.
    ///
    /// The response body is a plain object, not an envelope, so it is decoded
    /// directly. Any status other than `200` is classified.
    pub async fn account(&self) -> Result<Account> {
        let metadata = RequestMetadata::new(Method::GET, WHO_AM_I_PATH);
        let response = self.api.execute(metadata).await?;

        if response.status != StatusCode::OK {
            return Err(classify(&response));
        }

        serde_json::from_slice(&response.body).map_err(|e| decode_error(&response, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_paths() {
        let harvest = Harvest::new(Api::builder().subdomain("acme").unwrap().build().unwrap());

        assert_eq!(harvest.users().path(), "people");
        assert_eq!(harvest.projects().path(), "projects");
        assert_eq!(harvest.clients().path(), "clients");
        assert_eq!(harvest.tasks().path(), "tasks");
        assert_eq!(harvest.invoices().path(), "invoices");
        assert_eq!(harvest.day_entries(9).path(), "projects/9/entries");
        assert_eq!(harvest.task_assignments(9).path(), "projects/9/task_assignments");
    }
}
