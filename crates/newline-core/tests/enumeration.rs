//! Pagination behaviour of changed-file enumeration.

use newline_core::{list_changed_files, NewlineError, PullRequestContext};
use newline_github::fakes::MemoryRepository;
use newline_github::{ChangedFileRecord, FileStatus, Operation};

fn pr() -> PullRequestContext {
    PullRequestContext {
        owner: "octo".to_string(),
        repo: "widgets".to_string(),
        pr_number: 9,
        head_sha: "c0".to_string(),
        head_ref: "main".to_string(),
    }
}

fn repo_with(count: usize) -> MemoryRepository {
    let files = (0..count)
        .map(|i| ChangedFileRecord::new(format!("file-{i:04}.txt"), FileStatus::Added))
        .collect();
    MemoryRepository::new("main", "c0", "t0").with_changed_files(files)
}

#[tokio::test]
async fn full_page_then_empty_page() {
    let repo = repo_with(100);
    let files = list_changed_files(&repo, &pr()).await.unwrap();

    assert_eq!(files.len(), 100);
    assert_eq!(repo.page_fetches(), vec![1, 2]);
}

#[tokio::test]
async fn two_full_pages_then_short_page() {
    let repo = repo_with(240);
    let files = list_changed_files(&repo, &pr()).await.unwrap();

    assert_eq!(files.len(), 240);
    assert_eq!(repo.page_fetches(), vec![1, 2, 3]);
    assert_eq!(files[0].filename, "file-0000.txt");
    assert_eq!(files[239].filename, "file-0239.txt");
}

#[tokio::test]
async fn short_first_page_is_the_only_fetch() {
    let repo = repo_with(3);
    let files = list_changed_files(&repo, &pr()).await.unwrap();

    assert_eq!(files.len(), 3);
    assert_eq!(repo.page_fetches(), vec![1]);
}

#[tokio::test]
async fn empty_pull_request() {
    let repo = repo_with(0);
    let files = list_changed_files(&repo, &pr()).await.unwrap();

    assert!(files.is_empty());
    assert_eq!(repo.page_fetches(), vec![1]);
}

#[tokio::test]
async fn page_failure_yields_no_partial_result() {
    let repo = repo_with(150);
    repo.fail_on(Operation::ListFiles);

    let err = list_changed_files(&repo, &pr()).await.unwrap_err();
    assert!(matches!(err, NewlineError::Transport(_)));
}
