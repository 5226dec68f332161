//! Read-only access to crowdfunded projects and their funding progress.

use crate::errors::Result;
use crate::services::floss::FlossClient;

const SHARE_BASE: &str = "https://roamjs.com/projects";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Backer {
    pub funding: f64,
    pub backer: String,
    pub uuid: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target: f64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub backers: Vec<Backer>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectRef {
    pub uuid: String,
}

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<ProjectRef>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FundingSummary {
    pub funds_raised: f64,
    /// Whole percent of the target reached, rounded down.
    pub progress: u64,
    pub share_url: String,
}

impl Project {
    pub fn funds_raised(&self) -> f64 {
        self.backers.iter().map(|b| b.funding).sum()
    }

    pub fn summary(&self) -> FundingSummary {
        let funds_raised = self.funds_raised();
        let progress = if self.target > 0.0 {
            (100.0 * funds_raised / self.target).floor().max(0.0) as u64
        } else {
            0
        };
        FundingSummary {
            funds_raised,
            progress,
            share_url: format!("{}/{}", SHARE_BASE, self.uuid),
        }
    }
}

impl FlossClient {
    pub async fn project(&self, uuid: &str) -> Result<Project> {
        self.get("projects", &[("uuid", uuid)], None).await
    }

    pub async fn tenant_projects(&self, tenant: &str) -> Result<Vec<ProjectRef>> {
        let list: ProjectList = self
            .get("projects", &[("tenant", tenant), ("simple", "true")], None)
            .await?;
        Ok(list.projects)
    }
}
