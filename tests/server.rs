//! HTTP-level tests for scan-organizer.
//!
//! Every test builds a fresh input/output/trash/previews layout in a temp
//! directory and drives the real router through `axum-test`. The external
//! rasterizer and merge tool are replaced by in-process fakes, so no poppler
//! or pdfcpu install is needed.

use axum::http::StatusCode;
use axum_test::TestServer;
use scan_organizer::{
    router, OrganizerConfig, OrganizerError, PdfMerger, PreviewRenderer, Triage, TriageStatus,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Writes a tiny PNG signature where the rasterizer would.
struct FakeRenderer;

impl PreviewRenderer for FakeRenderer {
    fn render(&self, _pdf: &Path, out_prefix: &Path) -> Result<(), OrganizerError> {
        fs::write(out_prefix.with_extension("png"), b"\x89PNG\r\n\x1a\n")
            .map_err(|e| OrganizerError::io("write", out_prefix, e))
    }
}

/// Always fails, like a rasterizer choking on a damaged scan.
struct BrokenRenderer;

impl PreviewRenderer for BrokenRenderer {
    fn render(&self, pdf: &Path, _out_prefix: &Path) -> Result<(), OrganizerError> {
        Err(OrganizerError::RasterisationFailed {
            path: pdf.to_path_buf(),
            detail: "Syntax Error: Couldn't find trailer dictionary".into(),
        })
    }
}

/// Concatenates input bytes; can be switched to fail.
#[derive(Default)]
struct FakeMerger {
    fail: AtomicBool,
}

impl PdfMerger for FakeMerger {
    fn merge(&self, output: &Path, inputs: &[&Path]) -> Result<(), OrganizerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(OrganizerError::MergeFailed {
                status: "exit status: 1".into(),
                stdout: String::new(),
                stderr: "pdfcpu: merge: unexpected EOF".into(),
            });
        }
        let mut bytes = Vec::new();
        for input in inputs {
            bytes.extend(fs::read(input).map_err(|e| OrganizerError::io("read", *input, e))?);
        }
        fs::write(output, bytes).map_err(|e| OrganizerError::io("write", output, e))
    }
}

struct Harness {
    dir: TempDir,
    server: TestServer,
    merger: Arc<FakeMerger>,
}

impl Harness {
    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    async fn status(&self) -> TriageStatus {
        self.server.get("/api/status").await.json::<TriageStatus>()
    }
}

fn harness_with(files: &[&str], renderer: Arc<dyn PreviewRenderer>) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    for name in files {
        fs::write(input.join(name), format!("[{name}]")).unwrap();
    }

    let merger = Arc::new(FakeMerger::default());
    let config = OrganizerConfig::builder()
        .input_dir(input)
        .output_dir(dir.path().join("output"))
        .trash_dir(dir.path().join("trash"))
        .preview_dir(dir.path().join("previews"))
        .renderer(renderer)
        .merger(merger.clone())
        .build()
        .unwrap();

    let triage = Arc::new(Triage::open(config).unwrap());
    let server = TestServer::new(router(triage)).unwrap();
    Harness {
        dir,
        server,
        merger,
    }
}

fn harness(files: &[&str]) -> Harness {
    harness_with(files, Arc::new(FakeRenderer))
}

// ── Index page ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_without_pdfs_is_404() {
    let h = harness(&[]);
    let res = h.server.get("/").await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(res.text(), "No PDFs found");
}

#[tokio::test]
async fn index_shows_first_file_and_serves_its_preview() {
    let h = harness(&["scan_002.pdf", "scan_001.pdf", "notes.txt"]);

    let res = h.server.get("/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let html = res.text();
    assert!(html.contains("scan_001.pdf"));
    assert!(html.contains("1 / 2"));

    let start = html.find("/static/previews/").expect("preview url in page");
    let end = start + html[start..].find('"').unwrap();
    let url = &html[start..end];

    let img = h.server.get(url).await;
    assert_eq!(img.status_code(), StatusCode::OK);
    assert_eq!(&img.as_bytes()[..], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn broken_preview_still_renders_page() {
    let h = harness_with(&["damaged.pdf"], Arc::new(BrokenRenderer));

    let res = h.server.get("/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let html = res.text();
    assert!(html.contains("trailer dictionary"));
    assert!(!html.contains("<img"));

    // still disposable
    let res = h.server.post("/trash").await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert!(h.path("trash/damaged.pdf").exists());
}

// ── Rename ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rename_moves_file_and_redirects() {
    let h = harness(&["a.pdf", "b.pdf"]);

    let res = h
        .server
        .post("/rename")
        .form(&[("newname", "electricity-2024-03"), ("folder", "")])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(res.header("location"), "/");

    assert!(!h.path("input/a.pdf").exists());
    assert_eq!(
        fs::read_to_string(h.path("output/electricity-2024-03.pdf")).unwrap(),
        "[a.pdf]"
    );

    let status = h.status().await;
    assert_eq!(status.current.as_deref(), Some("b.pdf"));
    assert_eq!(status.renamed, vec!["electricity-2024-03.pdf"]);
}

#[tokio::test]
async fn rename_into_new_folder_lists_it() {
    let h = harness(&["a.pdf", "b.pdf"]);

    h.server
        .post("/rename")
        .form(&[("newname", "policy.PDF"), ("folder", "insurance/car")])
        .await;
    assert!(h.path("output/insurance/car/policy.PDF").exists());

    let html = h.server.get("/").await.text();
    assert!(html.contains(r#"<option value="insurance/car">insurance/car</option>"#));
    assert!(html.contains(r#"<option value="insurance/car/policy.PDF">"#));
}

#[tokio::test]
async fn rename_without_folder_field_uses_output_root() {
    let h = harness(&["a.pdf"]);
    let res = h.server.post("/rename").form(&[("newname", "x")]).await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert!(h.path("output/x.pdf").exists());
}

#[tokio::test]
async fn rename_rejects_path_tricks() {
    let h = harness(&["a.pdf"]);

    let res = h
        .server
        .post("/rename")
        .form(&[("newname", "../escaped"), ("folder", "")])
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    let res = h
        .server
        .post("/rename")
        .form(&[("newname", "fine"), ("folder", "../../etc")])
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    assert!(h.path("input/a.pdf").exists());
    assert_eq!(h.status().await.pending, vec!["a.pdf"]);
}

#[tokio::test]
async fn rename_onto_existing_file_conflicts() {
    let h = harness(&["a.pdf", "b.pdf"]);
    fs::create_dir_all(h.path("output")).unwrap();
    fs::write(h.path("output/taken.pdf"), "keep me").unwrap();

    let res = h.server.post("/rename").form(&[("newname", "taken")]).await;
    assert_eq!(res.status_code(), StatusCode::CONFLICT);
    assert_eq!(fs::read_to_string(h.path("output/taken.pdf")).unwrap(), "keep me");
    assert_eq!(h.status().await.current.as_deref(), Some("a.pdf"));
}

// ── Append ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_merges_onto_previous_rename() {
    let h = harness(&["letter_p1.pdf", "letter_p2.pdf", "other.pdf"]);

    h.server
        .post("/rename")
        .form(&[("newname", "bank-letter"), ("folder", "bank")])
        .await;
    let res = h
        .server
        .post("/append")
        .form(&[("target", "bank/bank-letter.pdf")])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);

    assert_eq!(
        fs::read_to_string(h.path("output/bank/bank-letter.pdf")).unwrap(),
        "[letter_p1.pdf][letter_p2.pdf]"
    );
    assert!(!h.path("input/letter_p2.pdf").exists());
    assert!(h.path("trash/letter_p2.pdf").exists());
    assert_eq!(h.status().await.current.as_deref(), Some("other.pdf"));
}

#[tokio::test]
async fn failed_merge_is_500_and_changes_nothing() {
    let h = harness(&["p1.pdf", "p2.pdf"]);
    h.server.post("/rename").form(&[("newname", "doc")]).await;
    h.merger.fail.store(true, Ordering::SeqCst);

    let res = h.server.post("/append").form(&[("target", "doc.pdf")]).await;
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = res.text();
    assert!(body.contains("Failed to merge"), "got: {body}");
    assert!(body.contains("unexpected EOF"), "got: {body}");

    assert_eq!(fs::read_to_string(h.path("output/doc.pdf")).unwrap(), "[p1.pdf]");
    assert!(h.path("input/p2.pdf").exists());
    assert_eq!(h.status().await.current.as_deref(), Some("p2.pdf"));
}

#[tokio::test]
async fn append_to_unknown_target_is_404() {
    let h = harness(&["p1.pdf"]);
    let res = h.server.post("/append").form(&[("target", "ghost.pdf")]).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

    let res = h.server.post("/append").form(&[("target", "")]).await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
}

// ── Trash and navigation ─────────────────────────────────────────────────────

#[tokio::test]
async fn trash_until_empty() {
    let h = harness(&["a.pdf", "b.pdf"]);

    for _ in 0..2 {
        let res = h.server.post("/trash").await;
        assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    }
    assert!(h.path("trash/a.pdf").exists());
    assert!(h.path("trash/b.pdf").exists());

    let res = h.server.post("/trash").await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(h.server.get("/").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn next_and_prev_move_the_cursor() {
    let h = harness(&["a.pdf", "b.pdf", "c.pdf"]);

    h.server.post("/next").await;
    h.server.post("/next").await;
    h.server.post("/next").await;
    assert_eq!(h.status().await.current.as_deref(), Some("c.pdf"));

    h.server.post("/prev").await;
    assert_eq!(h.status().await.position, Some(1));

    // consuming the middle file leaves the cursor on its follower
    h.server.post("/trash").await;
    let status = h.status().await;
    assert_eq!(status.current.as_deref(), Some("c.pdf"));
    assert_eq!(status.pending, vec!["a.pdf", "c.pdf"]);
}

#[tokio::test]
async fn rescan_picks_up_new_scans() {
    let h = harness(&[]);
    assert_eq!(h.server.get("/").await.status_code(), StatusCode::NOT_FOUND);

    fs::write(h.path("input/new.pdf"), "[new.pdf]").unwrap();
    let res = h.server.post("/rescan").await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);

    let res = h.server.get("/").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert!(res.text().contains("new.pdf"));
}
