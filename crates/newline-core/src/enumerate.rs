//! Changed-file enumeration.

use std::collections::HashSet;

use newline_github::{ChangedFileRecord, RepositoryClient, PAGE_SIZE};
use tracing::info;

use crate::context::PullRequestContext;
use crate::error::Result;
use crate::obs;

/// Fetch every file changed by the pull request.
///
/// Pages are requested from 1 upward until one holds fewer than
/// [`PAGE_SIZE`] records. Records keep arrival order; a filename seen on an
/// earlier page is dropped. Any page failure aborts the whole enumeration.
pub async fn list_changed_files(
    client: &dyn RepositoryClient,
    pr: &PullRequestContext,
) -> Result<Vec<ChangedFileRecord>> {
    info!("Looking for changed files...");
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut page = 0u32;

    loop {
        page += 1;
        let records = client.list_pull_request_files(pr.pr_number, page).await?;
        let count = records.len();
        obs::emit_page_fetched(page, count);

        for record in records {
            if seen.insert(record.filename.clone()) {
                files.push(record);
            }
        }

        if count < PAGE_SIZE {
            break;
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newline_github::fakes::MemoryRepository;
    use newline_github::FileStatus;

    fn pr() -> PullRequestContext {
        PullRequestContext {
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
            pr_number: 1,
            head_sha: "c0".to_string(),
            head_ref: "main".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicates_keep_first_occurrence() {
        let repo = MemoryRepository::new("main", "c0", "t0").with_changed_files(vec![
            ChangedFileRecord::new("a.txt", FileStatus::Modified),
            ChangedFileRecord::new("b.txt", FileStatus::Added),
            ChangedFileRecord::new("a.txt", FileStatus::Renamed),
        ]);

        let files = list_changed_files(&repo, &pr()).await.unwrap();
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(files[0].status, FileStatus::Modified);
        assert_eq!(repo.page_fetches(), vec![1]);
    }
}
