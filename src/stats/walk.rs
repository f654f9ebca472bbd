// Repository tree walk.
// Explicit work-list of directory paths, listed with bounded concurrency.

use std::collections::VecDeque;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use crate::error::Result;
use crate::github::{ContentEntry, ContentKind};
use crate::host::RepoHost;
use crate::repo::{Credential, RepoRef};

/// File and directory totals for a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeCounts {
    pub files: u64,
    pub directories: u64,
}

/// Count files and directories under the repository root.
///
/// A listing that fails contributes nothing, and its subtree is never
/// visited; the rest of the walk carries on. At most `concurrency` listings
/// are in flight at once. Symlinks and submodules are not counted.
pub async fn walk_tree<H: RepoHost>(
    host: &H,
    repo: &RepoRef,
    credential: &Credential,
    concurrency: usize,
) -> TreeCounts {
    let concurrency = concurrency.max(1);
    let mut counts = TreeCounts::default();
    let mut pending = VecDeque::from([String::new()]);
    let mut in_flight = FuturesUnordered::new();
    let mut listed = 0usize;

    loop {
        while in_flight.len() < concurrency {
            match pending.pop_front() {
                Some(path) => in_flight.push(list_dir(host, repo, credential, path)),
                None => break,
            }
        }

        let Some((path, listing)) = in_flight.next().await else {
            break;
        };
        listed += 1;

        let entries = match listing {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%repo, path = %path, error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            match entry.kind {
                ContentKind::File => counts.files += 1,
                ContentKind::Dir => {
                    counts.directories += 1;
                    pending.push_back(entry.path);
                }
                ContentKind::Symlink | ContentKind::Submodule | ContentKind::Unknown => {}
            }
        }
    }

    debug!(%repo, listed, files = counts.files, directories = counts.directories, "tree walk done");
    counts
}

async fn list_dir<H: RepoHost>(
    host: &H,
    repo: &RepoRef,
    credential: &Credential,
    path: String,
) -> (String, Result<Vec<ContentEntry>>) {
    let listing = host.directory(repo, &path, credential).await;
    (path, listing)
}
