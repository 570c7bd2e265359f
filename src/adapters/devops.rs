//! DevOps manager adapter (`spec.md` §4.7): authenticated HTTPS against an
//! Azure DevOps organisation using a PAT. Grounded on the
//! `reqwest::Client` + `bearer_auth` + `send_json`/`send_ok` helper shape of
//! `cloud/client.rs::CloudClient`.

use reqwest::Method;
use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn devops_err(e: impl std::fmt::Display) -> AppError {
    AppError::Network(e.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organisation {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineRun {
    pub id: u64,
    pub state: String,
    pub result: Option<String>,
}

/// HTTP client wrapping the handful of Azure DevOps REST endpoints the
/// DevOps manager popup needs (`spec.md` §4.7).
pub struct DevOpsClient {
    http: reqwest::Client,
    organisation: String,
    pat: String,
}

impl DevOpsClient {
    pub fn new(organisation: String, pat: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build reqwest client");
        DevOpsClient { http, organisation, pat }
    }

    fn authed(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        // Azure DevOps PATs are sent as basic auth with an empty username.
        self.http.request(method, url).basic_auth("", Some(&self.pat))
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        req.send()
            .await
            .map_err(devops_err)?
            .error_for_status()
            .map_err(devops_err)?
            .json()
            .await
            .map_err(devops_err)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        #[derive(Deserialize)]
        struct Wrapper {
            value: Vec<Project>,
        }
        let url = format!(
            "https://dev.azure.com/{}/_apis/projects?api-version=7.1",
            self.organisation
        );
        let wrapper: Wrapper = self.send_json(self.authed(Method::GET, &url)).await?;
        Ok(wrapper.value)
    }

    pub async fn list_pipelines(&self, project: &str) -> Result<Vec<Pipeline>, AppError> {
        #[derive(Deserialize)]
        struct Wrapper {
            value: Vec<Pipeline>,
        }
        let url = format!(
            "https://dev.azure.com/{}/{}/_apis/pipelines?api-version=7.1",
            self.organisation, project
        );
        let wrapper: Wrapper = self.send_json(self.authed(Method::GET, &url)).await?;
        Ok(wrapper.value)
    }

    pub async fn list_pipeline_runs(&self, project: &str, pipeline_id: u64) -> Result<Vec<PipelineRun>, AppError> {
        #[derive(Deserialize)]
        struct Wrapper {
            value: Vec<PipelineRun>,
        }
        let url = format!(
            "https://dev.azure.com/{}/{}/_apis/pipelines/{}/runs?api-version=7.1",
            self.organisation, project, pipeline_id
        );
        let wrapper: Wrapper = self.send_json(self.authed(Method::GET, &url)).await?;
        Ok(wrapper.value)
    }
}
