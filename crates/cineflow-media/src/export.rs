//! Export of rendered frames: bundle writing, integrity checks and muxing.
//!
//! Frames are written as a numbered image sequence into a bundle directory,
//! then FFmpeg (found on `PATH`) encodes the sequence, plus optional audio, to
//! a video file. Both stages can be cancelled.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{MediaError, Result};

/// Smallest bundle (or muxed output) accepted as a real export, in bytes.
pub const MIN_BUNDLE_BYTES: u64 = 1024;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// File name of the 1-based frame `index` (`frame_00001.png`).
pub fn frame_file_name(index: usize) -> String {
    format!("frame_{index:05}.png")
}

fn is_frame_file_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("frame_") else {
        return false;
    };
    let Some((number, ext)) = rest.split_once('.') else {
        return false;
    };
    !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

// ── Bundle ──────────────────────────────────────────────────────

/// Summary of a frame bundle on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BundleReport {
    pub frames: usize,
    pub total_bytes: u64,
}

/// Writes frame sequences into a bundle directory.
#[derive(Debug, Clone)]
pub struct FrameExport {
    bundle_dir: PathBuf,
}

impl FrameExport {
    pub fn new(bundle_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundle_dir: bundle_dir.into(),
        }
    }

    pub fn bundle_dir(&self) -> &Path {
        &self.bundle_dir
    }

    /// Write encoded PNG frames in order, then verify the bundle.
    ///
    /// `cancel` is checked before every frame.
    pub fn write_frames<I, F>(&self, frames: I, cancel: &ExportCancel) -> Result<BundleReport>
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[u8]>,
    {
        fs::create_dir_all(&self.bundle_dir)?;
        let mut written = 0usize;
        for (i, frame) in frames.into_iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(written, "Frame export cancelled");
                return Err(MediaError::Cancelled);
            }
            let path = self.bundle_dir.join(frame_file_name(i + 1));
            fs::write(&path, frame.as_ref())?;
            written += 1;
        }
        if written == 0 {
            return Err(MediaError::Export("no frames to write".into()));
        }
        debug!(written, dir = %self.bundle_dir.display(), "Frames written");
        verify_bundle(&self.bundle_dir)
    }
}

/// Check that `dir` holds a plausible frame bundle.
///
/// The bundle must be at least [`MIN_BUNDLE_BYTES`] in total, and every entry
/// must be a subdirectory or a frame image. PNG frames must carry the PNG
/// signature.
pub fn verify_bundle(dir: &Path) -> Result<BundleReport> {
    let mut report = BundleReport::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if meta.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_frame_file_name(&name) {
            return Err(MediaError::Integrity(format!("unexpected entry in bundle: {name}")));
        }
        if name.to_ascii_lowercase().ends_with(".png") {
            let bytes = fs::read(entry.path())?;
            if !bytes.starts_with(&PNG_MAGIC) {
                return Err(MediaError::Integrity(format!("{name} is not a PNG image")));
            }
        }
        report.frames += 1;
        report.total_bytes += meta.len();
    }
    if report.total_bytes < MIN_BUNDLE_BYTES {
        return Err(MediaError::Integrity(format!(
            "bundle is only {} bytes",
            report.total_bytes
        )));
    }
    Ok(report)
}

// ── Mux ─────────────────────────────────────────────────────────

/// Encode a frame bundle (and optional audio) into a video with FFmpeg.
#[derive(Debug, Clone)]
pub struct MuxJob {
    pub frames_dir: PathBuf,
    pub framerate: u32,
    pub audio: Option<PathBuf>,
    pub output: PathBuf,
    /// H.264 CRF (0-51, lower = better).
    pub crf: u32,
}

impl MuxJob {
    pub fn new(frames_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            framerate: 30,
            audio: None,
            output: output.into(),
            crf: 18,
        }
    }

    pub fn with_audio(mut self, audio: impl Into<PathBuf>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    pub fn with_framerate(mut self, framerate: u32) -> Self {
        self.framerate = framerate.max(1);
        self
    }

    /// Build the FFmpeg command arguments.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        let pattern = self.frames_dir.join("frame_%05d.png");
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-framerate".into(),
            self.framerate.to_string(),
            "-i".into(),
            pattern.to_string_lossy().into_owned(),
        ];
        if let Some(audio) = &self.audio {
            args.extend(["-i".into(), audio.to_string_lossy().into_owned()]);
        }

        args.extend([
            "-c:v".into(),
            "libx264".into(),
            "-crf".into(),
            self.crf.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
        ]);
        if self.audio.is_some() {
            args.extend(["-c:a".into(), "aac".into(), "-shortest".into()]);
        }

        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Run FFmpeg to completion and check the output file.
    ///
    /// `cancel` is polled while the process runs; cancelling kills it.
    pub fn run(&self, cancel: &ExportCancel) -> Result<u64> {
        if cancel.is_cancelled() {
            return Err(MediaError::Cancelled);
        }
        let ffmpeg = which::which("ffmpeg")
            .map_err(|e| MediaError::ToolNotFound(format!("ffmpeg: {e}")))?;

        let args = self.ffmpeg_args();
        info!(ffmpeg = %ffmpeg.display(), output = %self.output.display(), "Starting mux");
        let mut child = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::Export(format!("Failed to spawn ffmpeg: {e}")))?;

        let status = loop {
            if cancel.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                warn!("Mux cancelled");
                return Err(MediaError::Cancelled);
            }
            match child.try_wait()? {
                Some(status) => break status,
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        if !status.success() {
            return Err(MediaError::Export(format!("ffmpeg exited with status: {status}")));
        }

        let size = fs::metadata(&self.output).map(|m| m.len()).unwrap_or(0);
        if size < MIN_BUNDLE_BYTES {
            return Err(MediaError::Integrity(format!(
                "{} is only {size} bytes",
                self.output.display()
            )));
        }
        info!(bytes = size, "Mux finished");
        Ok(size)
    }
}

/// Handle for cancelling an in-progress export.
#[derive(Debug, Clone)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ExportCancel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_frame(len: usize) -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(len, 0);
        bytes
    }

    #[test]
    fn test_frame_names() {
        assert_eq!(frame_file_name(1), "frame_00001.png");
        assert!(is_frame_file_name("frame_00012.png"));
        assert!(is_frame_file_name("frame_7.JPG"));
        assert!(!is_frame_file_name("frame_.png"));
        assert!(!is_frame_file_name("frame_01.gif"));
        assert!(!is_frame_file_name("thumb_0001.png"));
    }

    #[test]
    fn test_write_and_verify() {
        let dir = tempfile::tempdir().unwrap();
        let export = FrameExport::new(dir.path().join("bundle"));
        let frames = vec![png_frame(600), png_frame(600), png_frame(600)];
        let report = export.write_frames(&frames, &ExportCancel::new()).unwrap();
        assert_eq!(report.frames, 3);
        assert_eq!(report.total_bytes, 1800);
        assert!(export.bundle_dir().join("frame_00003.png").exists());
    }

    #[test]
    fn test_small_bundle_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let export = FrameExport::new(dir.path());
        let err = export.write_frames([png_frame(100)], &ExportCancel::new()).unwrap_err();
        assert!(matches!(err, MediaError::Integrity(_)));
    }

    #[test]
    fn test_stray_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(frame_file_name(1)), png_frame(2048)).unwrap();
        fs::write(dir.path().join("notes.txt"), b"hi").unwrap();
        fs::create_dir(dir.path().join("audio")).unwrap();
        let err = verify_bundle(dir.path()).unwrap_err();
        assert!(matches!(err, MediaError::Integrity(_)));

        fs::remove_file(dir.path().join("notes.txt")).unwrap();
        assert_eq!(verify_bundle(dir.path()).unwrap().frames, 1);
    }

    #[test]
    fn test_png_without_signature_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(frame_file_name(1)), vec![0u8; 2048]).unwrap();
        assert!(matches!(verify_bundle(dir.path()), Err(MediaError::Integrity(_))));
    }

    #[test]
    fn test_cancelled_write() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = ExportCancel::new();
        cancel.cancel();
        let err = FrameExport::new(dir.path())
            .write_frames([png_frame(2048)], &cancel)
            .unwrap_err();
        assert!(matches!(err, MediaError::Cancelled));
        assert!(!dir.path().join(frame_file_name(1)).exists());
    }

    #[test]
    fn test_mux_args() {
        let job = MuxJob::new("/tmp/bundle", "/tmp/out.mp4")
            .with_framerate(24)
            .with_audio("/tmp/music.mp3");
        let args = job.ffmpeg_args();
        assert_eq!(&args[..3], ["-y", "-framerate", "24"]);
        assert_eq!(args[4], Path::new("/tmp/bundle").join("frame_%05d.png").to_string_lossy());
        assert_eq!(args[6], "/tmp/music.mp3");
        assert!(args.windows(2).any(|w| w == ["-crf", "18"]));
        assert!(args.contains(&"-shortest".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));

        let silent = MuxJob::new("/tmp/bundle", "/tmp/out.mp4").ffmpeg_args();
        assert!(!silent.contains(&"-c:a".to_string()));
    }

    #[test]
    fn test_mux_cancelled_before_start() {
        let cancel = ExportCancel::new();
        cancel.cancel();
        let err = MuxJob::new("/nonexistent", "/nonexistent/out.mp4").run(&cancel).unwrap_err();
        assert!(matches!(err, MediaError::Cancelled));
    }
}
