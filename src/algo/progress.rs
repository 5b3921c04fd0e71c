//! Progress callbacks.
//!
//! # Example
//!
//! ```
//! use trisect::algo::Progress;
//! use trisect::algo::refine::{refine_with_progress, RefineOptions};
//! use trisect::prelude::*;
//! use nalgebra::Point3;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh: SurfaceMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//! refine_with_progress(&mut mesh, &RefineOptions::new(2), &progress).unwrap();
//! assert_eq!(mesh.num_cells(), 16);
//! ```

/// Receives `(current, total, message)` updates from a refinement run.
///
/// `current` counts completed generations, so a run of `n` generations
/// reports `0..=n`.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_report_forwards_to_callback() {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(1, 2, "Refining");

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2, "Refining".to_string())]);
    }

    #[test]
    fn test_none_is_silent() {
        Progress::default().report(0, 0, "ignored");
        assert_eq!(format!("{:?}", Progress::none()), "Progress { .. }");
    }
}
