use crate::wizard::WizardSession;

/// Presentation sink for wizard changes.
#[async_trait::async_trait]
pub trait WizardEventPort: Send + Sync {
    async fn emit_wizard_changed(&self, session: WizardSession);
}
