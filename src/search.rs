use crate::models::{JobRecord, SearchScope};

// Pure: callers re-run this on every keystroke. Linear scan is plenty for the
// dataset sizes this app sees (~10k records).
pub fn filter_jobs(jobs: &[JobRecord], term: &str, scope: SearchScope) -> Vec<JobRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return jobs.to_vec();
    }

    let matched = jobs
        .iter()
        .filter(|job| matches_scope(job, &term, scope))
        .cloned()
        .collect::<Vec<_>>();

    match scope {
        // Title hits float to the front; each partition keeps dataset order.
        SearchScope::All | SearchScope::Title => {
            let (title_hits, rest): (Vec<_>, Vec<_>) = matched
                .into_iter()
                .partition(|job| contains(&job.job_title, &term));
            let mut ordered = title_hits;
            ordered.extend(rest);
            ordered
        }
        SearchScope::Company => matched,
    }
}

fn matches_scope(job: &JobRecord, term: &str, scope: SearchScope) -> bool {
    match scope {
        SearchScope::Title => contains(&job.job_title, term),
        SearchScope::Company => contains(&job.company_name, term),
        SearchScope::All => {
            contains(&job.job_title, term)
                || contains(&job.company_name, term)
                || contains(&job.location, term)
                || contains(&job.job_description, term)
                || contains(&job.requirements, term)
        }
    }
}

fn contains(haystack: &str, lowered_term: &str) -> bool {
    haystack.to_lowercase().contains(lowered_term)
}

#[cfg(test)]
mod tests {
    use super::filter_jobs;
    use crate::models::{JobRecord, SearchScope};

    fn job(title: &str, company: &str, location: &str, description: &str, requirements: &str) -> JobRecord {
        JobRecord {
            id: format!("{}-{}", title.to_lowercase(), company.to_lowercase()),
            job_title: title.to_string(),
            company_name: company.to_string(),
            location: location.to_string(),
            job_description: description.to_string(),
            requirements: requirements.to_string(),
            date_posted: None,
            salary: None,
            tags: None,
            company_logo_url: None,
            bookmarked: false,
            coordinates: None,
            extra: Default::default(),
        }
    }

    fn sample() -> Vec<JobRecord> {
        vec![
            job("Data Analyst", "Globex", "Chicago, IL", "dev tooling team", "SQL"),
            job("Backend Dev", "Acme", "Austin, TX", "build APIs", "Rust"),
            job("Designer", "Initech", "Boston, MA", "mockups", "Figma"),
        ]
    }

    #[test]
    fn empty_or_whitespace_term_returns_everything_in_order() {
        let jobs = sample();
        for term in ["", "   ", "\t"] {
            let result = filter_jobs(&jobs, term, SearchScope::All);
            assert_eq!(result, jobs);
        }
    }

    #[test]
    fn all_scope_matches_any_of_the_five_fields() {
        let jobs = sample();
        assert_eq!(filter_jobs(&jobs, "figma", SearchScope::All).len(), 1);
        assert_eq!(filter_jobs(&jobs, "austin", SearchScope::All).len(), 1);
        assert_eq!(filter_jobs(&jobs, "GLOBEX", SearchScope::All).len(), 1);
        assert!(filter_jobs(&jobs, "zzz", SearchScope::All).is_empty());
    }

    #[test]
    fn title_hits_sort_before_other_field_hits() {
        // "dev" appears in the first job's description only, and in the
        // second job's title; the title hit must come first.
        let jobs = sample();
        let result = filter_jobs(&jobs, "dev", SearchScope::All);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].job_title, "Backend Dev");
        assert_eq!(result[1].job_title, "Data Analyst");
    }

    #[test]
    fn title_scope_ignores_other_fields() {
        let jobs = sample();
        let result = filter_jobs(&jobs, "dev", SearchScope::Title);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].job_title, "Backend Dev");
    }

    #[test]
    fn company_scope_keeps_dataset_order() {
        let mut jobs = sample();
        jobs.push(job("Backend Lead", "Acme", "Austin, TX", "lead", "Rust"));
        let result = filter_jobs(&jobs, "acme", SearchScope::Company);
        assert_eq!(
            result.iter().map(|j| j.job_title.as_str()).collect::<Vec<_>>(),
            vec!["Backend Dev", "Backend Lead"]
        );

        assert!(filter_jobs(&jobs, "dev", SearchScope::Company).is_empty());
    }

    #[test]
    fn partitions_are_stable_within_themselves() {
        let jobs = vec![
            job("Ops", "A", "x", "needs a dev", "-"),
            job("Dev One", "B", "x", "-", "-"),
            job("Ops Two", "C", "x", "dev adjacent", "-"),
            job("Dev Two", "D", "x", "-", "-"),
        ];
        let result = filter_jobs(&jobs, "dev", SearchScope::All);
        assert_eq!(
            result.iter().map(|j| j.job_title.as_str()).collect::<Vec<_>>(),
            vec!["Dev One", "Dev Two", "Ops", "Ops Two"]
        );
    }
}
