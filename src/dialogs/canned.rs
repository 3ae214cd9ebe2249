//! Fixed-reply dialogs: help, cancel and the default fallback

use super::Dialog;
use crate::models::ClassificationResult;
use crate::session::Session;
use crate::Result;

pub struct HelpDialog;

#[async_trait::async_trait]
impl Dialog for HelpDialog {
    fn name(&self) -> &'static str {
        "HelpDialog"
    }

    async fn run(&self, session: &mut Session, _args: &ClassificationResult) -> Result<()> {
        let reply = format!(
            "You reached the Help intent. You said '{}'.",
            session.message_text()
        );
        session.send(reply);
        Ok(())
    }
}

pub struct CancelDialog;

#[async_trait::async_trait]
impl Dialog for CancelDialog {
    fn name(&self) -> &'static str {
        "CancelDialog"
    }

    async fn run(&self, session: &mut Session, _args: &ClassificationResult) -> Result<()> {
        let reply = format!(
            "You reached the Cancel intent. You said '{}'.",
            session.message_text()
        );
        session.send(reply);
        Ok(())
    }
}

/// Runs for any intent without a registered dialog
pub struct DefaultDialog;

#[async_trait::async_trait]
impl Dialog for DefaultDialog {
    fn name(&self) -> &'static str {
        "DefaultDialog"
    }

    async fn run(&self, session: &mut Session, _args: &ClassificationResult) -> Result<()> {
        let reply = format!(
            "You reached the default message handler. You said '{}'.",
            session.message_text()
        );
        session.send(reply);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_replies_quote_the_message() {
        let args = ClassificationResult::none();

        let mut session = Session::new("conv", "I need help");
        HelpDialog.run(&mut session, &args).await.unwrap();
        assert_eq!(
            session.replies(),
            ["You reached the Help intent. You said 'I need help'.".to_string()]
        );

        let mut session = Session::new("conv", "stop");
        CancelDialog.run(&mut session, &args).await.unwrap();
        assert_eq!(
            session.replies(),
            ["You reached the Cancel intent. You said 'stop'.".to_string()]
        );

        let mut session = Session::new("conv", "blorp");
        DefaultDialog.run(&mut session, &args).await.unwrap();
        assert_eq!(
            session.replies(),
            ["You reached the default message handler. You said 'blorp'.".to_string()]
        );
    }
}
