//! End-to-end sorting scenarios

use category_sorter::sort::{
    CopyOptions, Enumerator, SortStats, WorkQueue, Worker, WorkerShared, start_gate,
};
use category_sorter::{CancelToken, Config, Progress, SortSummary, Sorter};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::Ordering;
use std::thread;
use tempfile::tempdir;

fn sort(source: &Path, output: &Path, workers: usize) -> SortSummary {
    let config = Config {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        workers,
        ..Config::default()
    };
    Sorter::new(&config)
        .unwrap()
        .with_progress(Progress::hidden())
        .run()
        .unwrap()
}

/// Nested tree with files at every level; returns the directory count
fn build_nested_tree(root: &Path) -> usize {
    let mut dirs = 1;
    for (i, branch) in ["photos", "музика", "docs"].iter().enumerate() {
        let branch_dir = root.join(branch);
        fs::create_dir(&branch_dir).unwrap();
        dirs += 1;
        fs::write(branch_dir.join(format!("top{i}.jpg")), b"img").unwrap();
        for j in 0..3 {
            let leaf = branch_dir.join(format!("leaf{j}"));
            fs::create_dir(&leaf).unwrap();
            dirs += 1;
            fs::write(leaf.join(format!("f{i}{j}.mp3")), b"audio").unwrap();
            fs::write(leaf.join(format!("f{i}{j}.weird")), b"other").unwrap();
        }
    }
    // An empty directory still counts.
    fs::create_dir(root.join("empty")).unwrap();
    dirs + 1
}

#[test]
fn test_single_directory_classification() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(src.path().join("a.jpg"), b"jpg bytes").unwrap();
    fs::write(src.path().join("b.mkv"), b"mkv bytes").unwrap();
    fs::write(src.path().join("c.unknownext"), b"???").unwrap();
    fs::write(src.path().join("d"), b"no ext").unwrap();

    let summary = sort(src.path(), out.path(), 5);

    assert_eq!(fs::read(out.path().join("images/a.jpg")).unwrap(), b"jpg bytes");
    assert_eq!(fs::read(out.path().join("video/b.mkv")).unwrap(), b"mkv bytes");
    assert_eq!(fs::read(out.path().join("others/c.unknownext")).unwrap(), b"???");
    assert_eq!(fs::read(out.path().join("others/d")).unwrap(), b"no ext");
    assert_eq!(summary.files_copied, 4);
    assert_eq!(summary.files_failed, 0);
    assert!(summary.is_complete());

    // Sources are left untouched.
    assert!(src.path().join("a.jpg").exists());
}

#[test]
fn test_transliterated_name() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::write(src.path().join("привіт мир!.txt"), b"hello").unwrap();

    sort(src.path(), out.path(), 2);

    assert_eq!(
        fs::read(out.path().join("documents/pryvit_myr_.txt")).unwrap(),
        b"hello"
    );
}

#[test]
fn test_processed_matches_total_for_any_pool_size() {
    let src = tempdir().unwrap();
    let expected_dirs = build_nested_tree(src.path());

    for workers in 1..=8 {
        let out = tempdir().unwrap();
        let summary = sort(src.path(), out.path(), workers);

        assert_eq!(summary.directories_total, expected_dirs, "workers={workers}");
        assert_eq!(summary.directories_processed, expected_dirs, "workers={workers}");
        assert_eq!(summary.files_copied, 3 + 9 * 2, "workers={workers}");
        assert!(out.path().join("audio/f12.mp3").is_file());
        assert!(out.path().join("others/f21.weird").is_file());
    }
}

#[test]
fn test_output_inside_source_is_not_resorted() {
    let src = tempdir().unwrap();
    fs::write(src.path().join("a.png"), b"png").unwrap();
    let out = src.path().join("sorted");

    let first = sort(src.path(), &out, 3);
    assert_eq!(first.files_copied, 1);

    let second = sort(src.path(), &out, 3);
    assert_eq!(second.directories_total, 1);
    assert_eq!(second.files_copied, 1);
    assert!(!out.join("images/images").exists());
}

#[test]
fn test_name_collision_last_writer_wins() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::create_dir(src.path().join("x")).unwrap();
    fs::create_dir(src.path().join("y")).unwrap();
    fs::write(src.path().join("x/same.txt"), b"from x").unwrap();
    fs::write(src.path().join("y/same.txt"), b"from y").unwrap();

    let summary = sort(src.path(), out.path(), 1);

    assert_eq!(summary.files_copied, 2);
    let content = fs::read(out.path().join("documents/same.txt")).unwrap();
    assert!(content == b"from x" || content == b"from y");
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_does_not_abort() {
    use std::os::unix::fs::PermissionsExt;

    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    for (dir, file) in [("first", "one.txt"), ("locked", "secret.txt"), ("second", "two.jpg")] {
        fs::create_dir(src.path().join(dir)).unwrap();
        fs::write(src.path().join(dir).join(file), b"data").unwrap();
    }
    fs::create_dir(src.path().join("locked/inner")).unwrap();

    let locked = src.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users can still read it; then there is nothing to skip.
    let really_locked = fs::read_dir(&locked).is_err();

    let summary = sort(src.path(), out.path(), 3);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(out.path().join("documents/one.txt").is_file());
    assert!(out.path().join("images/two.jpg").is_file());
    assert!(summary.is_complete());

    if really_locked {
        assert!(!out.path().join("documents/secret.txt").exists());
        // Reported once, by the worker that claimed it.
        assert_eq!(summary.walk_errors, 0);
        assert_eq!(summary.unreadable_dirs, 1);
        assert!(summary.summary().contains("Unreadable: 1"));
        // root, first, locked, second
        assert_eq!(summary.directories_total, 4);
    } else {
        assert!(out.path().join("documents/secret.txt").is_file());
        assert!(summary.summary().contains("Unreadable: 0"));
        assert_eq!(summary.directories_total, 5);
    }
}

#[test]
fn test_output_equal_to_source_keeps_sorted_files() {
    let root = tempdir().unwrap();
    fs::create_dir(root.path().join("documents")).unwrap();
    fs::write(root.path().join("documents/notes.txt"), b"keep me").unwrap();
    fs::create_dir(root.path().join("trips")).unwrap();
    fs::write(root.path().join("trips/map.png"), b"map").unwrap();

    let summary = sort(root.path(), root.path(), 3);

    assert_eq!(fs::read(root.path().join("documents/notes.txt")).unwrap(), b"keep me");
    assert_eq!(fs::read(root.path().join("images/map.png")).unwrap(), b"map");
    // root and trips; the category folder is not enumerated
    assert_eq!(summary.directories_total, 2);
    assert_eq!(summary.files_copied, 1);
    assert_eq!(summary.files_failed, 0);
}

#[test]
fn test_source_below_output_keeps_sorted_files() {
    let root = tempdir().unwrap();
    let images = root.path().join("images");
    fs::create_dir(&images).unwrap();
    fs::write(images.join("photo.jpg"), b"precious bytes").unwrap();
    fs::write(images.join("readme.txt"), b"text").unwrap();

    let summary = sort(&images, root.path(), 2);

    assert_eq!(fs::read(images.join("photo.jpg")).unwrap(), b"precious bytes");
    assert_eq!(fs::read(root.path().join("documents/readme.txt")).unwrap(), b"text");
    assert_eq!(summary.files_copied, 1);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.files_failed, 0);
}

/// A queued directory that can no longer be listed is counted and skipped
/// while its siblings are still sorted.
#[test]
fn test_unlistable_sibling_does_not_abort() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    for (dir, file) in [("first", "one.txt"), ("broken", "lost.txt"), ("second", "two.jpg")] {
        fs::create_dir(src.path().join(dir)).unwrap();
        fs::write(src.path().join(dir).join(file), b"data").unwrap();
    }

    let queue = WorkQueue::new();
    queue.seed(src.path().to_path_buf());
    let (sender, receiver) = queue.split();
    let (signal, gate) = start_gate();
    let progress = Progress::hidden();
    let cancel = CancelToken::new();
    let walk = Enumerator::new(src.path(), &cancel).run(sender, &progress, signal);
    assert_eq!(walk.discovered, 4);

    fs::remove_dir_all(src.path().join("broken")).unwrap();

    let stats = SortStats::default();
    let shared = WorkerShared {
        output: out.path(),
        options: CopyOptions::default(),
        progress: &progress,
        stats: &stats,
        cancel: &cancel,
    };
    thread::scope(|s| {
        for id in 0..3 {
            let worker = Worker::new(id, receiver.clone(), gate.clone(), shared);
            s.spawn(move || worker.run());
        }
    });

    assert!(out.path().join("documents/one.txt").is_file());
    assert!(out.path().join("images/two.jpg").is_file());
    assert!(!out.path().join("documents/lost.txt").exists());
    assert_eq!(stats.unreadable_dirs.load(Ordering::Relaxed), 1);
    assert_eq!(stats.files_copied.load(Ordering::Relaxed), 2);
    assert!(progress.is_complete());
}

/// Workers must never see a dequeue before enumeration has finished and
/// the total has been recorded.
#[test]
fn test_no_dequeue_before_release() {
    let src = tempdir().unwrap();
    let expected = build_nested_tree(src.path());

    for _ in 0..50 {
        let queue = WorkQueue::new();
        queue.seed(src.path().to_path_buf());
        let (sender, receiver) = queue.split();
        let (signal, gate) = start_gate();
        let progress = Progress::hidden();
        let cancel = CancelToken::new();
        let observed: Mutex<Vec<(bool, Option<usize>)>> = Mutex::new(Vec::new());
        let popped: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

        thread::scope(|s| {
            for _ in 0..6 {
                let receiver = receiver.clone();
                let gate = gate.clone();
                let (progress, observed, popped) = (&progress, &observed, &popped);
                s.spawn(move || {
                    gate.wait();
                    while let Some(dir) = receiver.try_pop() {
                        observed
                            .lock()
                            .unwrap()
                            .push((gate.is_released(), progress.total()));
                        popped.lock().unwrap().push(dir);
                        progress.advance();
                    }
                });
            }

            let enumerator = Enumerator::new(src.path(), &cancel);
            let progress = &progress;
            s.spawn(move || enumerator.run(sender, progress, signal));
        });

        let observed = observed.into_inner().unwrap();
        assert_eq!(observed.len(), expected);
        assert!(
            observed
                .iter()
                .all(|&(released, total)| released && total == Some(expected))
        );
        assert_eq!(popped.into_inner().unwrap().len(), expected);
        assert_eq!(progress.processed(), expected);
    }
}
