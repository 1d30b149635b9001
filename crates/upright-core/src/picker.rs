//! Completion handling for a host-owned image picker.
//!
//! The host toolkit owns the picking surface and reports how it finished with
//! a [`PickOutcome`]. A [`PickerCoordinator`] turns that into the calls the
//! application cares about: the sheet is always dismissed first, then a
//! picked image is brought upright and handed over, or the cancel callback
//! runs.
//!
//! Dispatching onto a UI thread is left to the host; the coordinator runs
//! every callback synchronously on the thread that calls
//! [`PickerCoordinator::finish`].

use log::warn;

use crate::bitmap::Bitmap;
use crate::orientation::{OrientationError, OrientedImage};

/// How a pick session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// The user chose an image.
    Picked(OrientedImage),
    /// The picker finished without providing an image.
    NoImage,
    /// The user dismissed the picker.
    Cancelled,
}

type Callback = Box<dyn FnMut() + Send>;
type PickedCallback = Box<dyn FnMut(Bitmap) + Send>;

/// Routes a [`PickOutcome`] to the application's callbacks.
pub struct PickerCoordinator {
    dismiss: Callback,
    picked: PickedCallback,
    cancelled: Callback,
}

impl PickerCoordinator {
    /// Create a coordinator. Cancellation is ignored unless
    /// [`on_cancelled`](Self::on_cancelled) is set.
    pub fn new<D, P>(dismiss: D, on_picked: P) -> Self
    where
        D: FnMut() + Send + 'static,
        P: FnMut(Bitmap) + Send + 'static,
    {
        Self {
            dismiss: Box::new(dismiss),
            picked: Box::new(on_picked),
            cancelled: Box::new(|| {}),
        }
    }

    /// Set the callback that runs when the pick is cancelled.
    pub fn on_cancelled<C>(mut self, on_cancelled: C) -> Self
    where
        C: FnMut() + Send + 'static,
    {
        self.cancelled = Box::new(on_cancelled);
        self
    }

    /// Handle the end of a pick session.
    ///
    /// The picker is dismissed before any other callback runs. A picked image
    /// is normalized and passed to the picked callback.
    ///
    /// # Errors
    ///
    /// If the picked image can't be normalized, the cancel callback runs
    /// instead and the error is returned to the host.
    pub fn finish(&mut self, outcome: PickOutcome) -> Result<(), OrientationError> {
        (self.dismiss)();

        match outcome {
            PickOutcome::Picked(image) => match image.fix_orientation() {
                Ok(upright) => {
                    (self.picked)(upright.into_bitmap());
                    Ok(())
                }
                Err(e) => {
                    warn!("picked image could not be normalized: {}", e);
                    (self.cancelled)();
                    Err(e)
                }
            },
            PickOutcome::NoImage => Ok(()),
            PickOutcome::Cancelled => {
                (self.cancelled)();
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for PickerCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerCoordinator").finish_non_exhaustive()
    }
}
