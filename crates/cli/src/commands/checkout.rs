//! Checkout command.

use std::process::ExitCode;

use super::Session;

/// Submit the cart and print the outcome notice.
///
/// Only a placed order exits successfully.
pub async fn run(session: &Session) -> ExitCode {
    let outcome = session.checkout().await;
    let notice = outcome.notice(session.presenter().currency());

    #[allow(clippy::print_stdout)]
    {
        println!("{notice}");
    }

    if outcome.is_placed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
