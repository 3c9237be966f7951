use crate::errors::{AppError, AppResult};
use crate::geo;
use crate::models::JobRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::OnceCell;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = AppResult<String>> + Send + 'a>>;

pub trait DatasetSource: Send + Sync {
    fn fetch(&self) -> FetchFuture<'_>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(AppError::from)
        })
    }
}

#[derive(Debug, Clone)]
pub struct StaticSource {
    csv_text: String,
}

impl StaticSource {
    pub fn new(csv_text: impl Into<String>) -> Self {
        Self {
            csv_text: csv_text.into(),
        }
    }
}

impl DatasetSource for StaticSource {
    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move { Ok(self.csv_text.clone()) })
    }
}

pub struct JobCatalog {
    source: Arc<dyn DatasetSource>,
    cache: OnceCell<Arc<Vec<JobRecord>>>,
}

impl JobCatalog {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    // Fetches and parses at most once; a failed attempt caches nothing so the
    // next call retries from scratch.
    pub async fn load_all(&self) -> AppResult<Arc<Vec<JobRecord>>> {
        self.cache
            .get_or_try_init(|| async {
                let raw = self.source.fetch().await?;
                let jobs = parse_dataset(&raw)?;
                tracing::info!(count = jobs.len(), "job dataset loaded");
                Ok(Arc::new(jobs))
            })
            .await
            .map(Arc::clone)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<JobRecord>> {
        let jobs = self.load_all().await?;
        Ok(jobs.iter().find(|job| job.id == id).cloned())
    }
}

// Ordinal-suffixed slug, reproducible for identical input order. Reordering
// the source rows changes the IDs; callers must treat them as session-scoped.
pub fn job_id(job_title: &str, company_name: &str, index: usize) -> String {
    let lowered = format!("{}-{}", job_title, company_name).to_lowercase();
    let slug = SLUG_RE.replace_all(&lowered, "-");
    let base = slug.trim_matches('-');
    format!("{}-{:03}", base, index)
}

fn canonical_field(header: &str) -> Option<&'static str> {
    match header {
        "Job Title" => Some("jobTitle"),
        "Company Name" => Some("companyName"),
        "Location" => Some("location"),
        "Job Description" => Some("jobDescription"),
        "Requirements" => Some("requirements"),
        "Date Posted" => Some("datePosted"),
        "Salary" => Some("salary"),
        "Tags" => Some("tags"),
        "Company Logo URL" => Some("companyLogoUrl"),
        _ => None,
    }
}

fn parse_dataset(raw: &str) -> AppResult<Vec<JobRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(AppError::from)?
        .iter()
        .map(|header| header.trim().to_string())
        .collect::<Vec<_>>();

    let mut jobs = Vec::new();
    for result in reader.records() {
        let record = result.map_err(AppError::from)?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut fields: BTreeMap<&'static str, String> = BTreeMap::new();
        let mut extra: BTreeMap<String, String> = BTreeMap::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            match canonical_field(header) {
                Some(name) => {
                    fields.insert(name, value.to_string());
                }
                None => {
                    extra.insert(header.clone(), value.to_string());
                }
            }
        }

        let job_title = take(&mut fields, "jobTitle");
        let company_name = take(&mut fields, "companyName");
        let location = take(&mut fields, "location");
        let index = jobs.len();

        jobs.push(JobRecord {
            id: job_id(&job_title, &company_name, index),
            coordinates: geo::lookup(&location),
            job_description: take(&mut fields, "jobDescription"),
            requirements: take(&mut fields, "requirements"),
            date_posted: take_opt(&mut fields, "datePosted"),
            salary: take_opt(&mut fields, "salary"),
            tags: take_opt(&mut fields, "tags").map(|raw| parse_tags(&raw)),
            company_logo_url: take_opt(&mut fields, "companyLogoUrl"),
            bookmarked: false,
            job_title,
            company_name,
            location,
            extra,
        });
    }

    Ok(jobs)
}

fn take(fields: &mut BTreeMap<&'static str, String>, name: &str) -> String {
    fields.remove(name).unwrap_or_default()
}

fn take_opt(fields: &mut BTreeMap<&'static str, String>, name: &str) -> Option<String> {
    fields.remove(name).filter(|value| !value.trim().is_empty())
}

fn parse_tags(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}
