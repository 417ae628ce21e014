use crate::domain::MergeMethod;
use crate::error::{HotfixError, Result};
use crate::gateway::{
    BranchInfo, Comparison, MergeStatus, NewPullRequest, PullRequest, RemoteGateway,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

/// `owner/repo` coordinates of a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    /// Parse an `owner/repo` string such as the `GITHUB_REPOSITORY` variable
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(RepoSlug {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(HotfixError::config(format!(
                "Invalid repository '{}': expected 'owner/repo'",
                slug
            ))),
        }
    }
}

#[derive(Deserialize)]
struct RefResponse {
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Annotated tags nest: a tag object may point at another tag
const MAX_TAG_DEPTH: usize = 8;

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// GitHub REST implementation of [RemoteGateway]
pub struct GithubGateway {
    client: Client,
    api_url: String,
    slug: RepoSlug,
    token: String,
}

impl GithubGateway {
    /// Build a gateway for one repository
    ///
    /// # Arguments
    /// * `api_url` - Base API URL (e.g. "https://api.github.com")
    /// * `slug` - Repository coordinates
    /// * `token` - Token sent as a bearer credential
    /// * `user_agent` - Value of the `User-Agent` header (required by GitHub)
    pub fn new(api_url: &str, slug: RepoSlug, token: &str, user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(GithubGateway {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            slug,
            token: token.to_string(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.slug.owner, self.slug.repo, path
        )
    }

    fn request(&self, builder: RequestBuilder) -> Result<Response> {
        Ok(builder
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(&self.token)
            .send()?)
    }

    /// GET a resource, mapping 404 to `None`
    fn lookup<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.repo_url(path);
        debug!(%url, "GET");
        let response = self.request(self.client.get(&url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(ensure_success(response)?.json()?))
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.lookup(path)?
            .ok_or_else(|| HotfixError::not_found(self.repo_url(path)))
    }
}

/// Turn a non-2xx response into a remote error carrying GitHub's message
fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(HotfixError::remote(error_message(status, &body)))
}

/// Percent-encode each segment of a branch or ref path, keeping `/` separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("{} (HTTP {})", parsed.message, status.as_u16()),
        Err(_) if body.trim().is_empty() => format!("HTTP {}", status.as_u16()),
        Err(_) => format!("{} (HTTP {})", body.trim(), status.as_u16()),
    }
}

impl RemoteGateway for GithubGateway {
    /// Annotated tags are peeled to the commit they point at.
    fn get_ref(&self, ref_path: &str) -> Result<Option<String>> {
        let found: Option<RefResponse> =
            self.lookup(&format!("git/ref/{}", encode_path(ref_path)))?;
        let Some(mut object) = found.map(|r| r.object) else {
            return Ok(None);
        };

        for _ in 0..MAX_TAG_DEPTH {
            if object.kind != "tag" {
                return Ok(Some(object.sha));
            }
            let tag: RefResponse = self.fetch(&format!("git/tags/{}", object.sha))?;
            object = tag.object;
        }

        Err(HotfixError::remote(format!(
            "Cannot peel tag '{}': too many nested tag objects",
            ref_path
        )))
    }

    fn create_ref(&self, ref_name: &str, sha: &str) -> Result<()> {
        let body = json!({ "ref": ref_name, "sha": sha });
        let response = self.request(self.client.post(self.repo_url("git/refs")).json(&body))?;
        ensure_success(response)?;
        Ok(())
    }

    fn delete_ref(&self, ref_path: &str) -> Result<()> {
        let url = self.repo_url(&format!("git/refs/{}", encode_path(ref_path)));
        let response = self.request(self.client.delete(url))?;
        ensure_success(response)?;
        Ok(())
    }

    fn get_branch(&self, name: &str) -> Result<Option<BranchInfo>> {
        self.lookup(&format!("branches/{}", encode_path(name)))
    }

    fn list_branches(&self, per_page: u32) -> Result<Vec<BranchInfo>> {
        let per_page = per_page.clamp(1, 100);
        let mut branches = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<BranchInfo> =
                self.fetch(&format!("branches?per_page={}&page={}", per_page, page))?;
            let short_page = batch.len() < per_page as usize;
            branches.extend(batch);

            if short_page {
                break;
            }
            page += 1;
        }

        Ok(branches)
    }

    fn compare_commits(&self, base: &str, head: &str) -> Result<Comparison> {
        self.fetch(&format!("compare/{}...{}", encode_path(base), encode_path(head)))
    }

    fn merge_branches(&self, base: &str, head: &str, message: &str) -> Result<MergeStatus> {
        let body = json!({ "base": base, "head": head, "commit_message": message });
        let response = self.request(self.client.post(self.repo_url("merges")).json(&body))?;

        match response.status() {
            StatusCode::CREATED => Ok(MergeStatus::Created),
            StatusCode::NO_CONTENT => Ok(MergeStatus::UpToDate),
            StatusCode::CONFLICT => Ok(MergeStatus::Conflict),
            _ => ensure_success(response).and_then(|r| {
                Err(HotfixError::remote(format!(
                    "Unexpected merge status {}",
                    r.status().as_u16()
                )))
            }),
        }
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<PullRequest> {
        let body = json!({
            "title": request.title,
            "body": request.body,
            "head": request.head,
            "base": request.base,
        });
        let response = self.request(self.client.post(self.repo_url("pulls")).json(&body))?;
        Ok(ensure_success(response)?.json()?)
    }

    fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        self.fetch(&format!("pulls/{}", number))
    }

    fn merge_pull_request(&self, number: u64, method: MergeMethod) -> Result<()> {
        let url = self.repo_url(&format!("pulls/{}/merge", number));
        let body = json!({ "merge_method": method.as_str() });
        let response = self.request(self.client.put(url).json(&body))?;
        ensure_success(response)?;
        Ok(())
    }
}
