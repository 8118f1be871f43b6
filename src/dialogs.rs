// User confirmation and file picking
// Native implementations use rfd and only exist in desktop builds

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

/// Blocking yes/no prompt
pub trait Confirm {
    fn confirm(&self, title: &str, message: &str, detail: &str) -> Confirmation;
}

/// Always answers the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub Confirmation);

impl Confirm for FixedAnswer {
    fn confirm(&self, _title: &str, _message: &str, _detail: &str) -> Confirmation {
        self.0
    }
}

#[cfg(feature = "desktop")]
pub use native::{NativeConfirm, pickPdf};

#[cfg(feature = "desktop")]
mod native {
    use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

    use super::{Confirm, Confirmation};

    const DELETE_LABEL: &str = "Delete";

    /// Native warning dialog with Delete / Cancel buttons
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NativeConfirm;

    impl Confirm for NativeConfirm {
        fn confirm(&self, title: &str, message: &str, detail: &str) -> Confirmation {
            let result = MessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title(title)
                .set_description(format!("{}\n\n{}", message, detail))
                .set_buttons(MessageButtons::OkCancelCustom(DELETE_LABEL.to_string(), "Cancel".to_string()))
                .show();

            match result {
                MessageDialogResult::Ok | MessageDialogResult::Yes => Confirmation::Confirmed,
                MessageDialogResult::Custom(label) if label == DELETE_LABEL => Confirmation::Confirmed,
                _ => Confirmation::Cancelled,
            }
        }
    }

    /// Let the user choose a PDF. None when the dialog was dismissed.
    pub fn pickPdf() -> Option<String> {
        FileDialog::new()
            .set_title("Select Exercise Sheet")
            .add_filter("PDF Files", &["pdf"])
            .pick_file()
            .map(|p| p.to_string_lossy().to_string())
    }
}
