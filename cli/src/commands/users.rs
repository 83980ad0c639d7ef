//! User directory lookups.

use anyhow::Result;
use newsdesk_shared::{
    normalize::{decode_envelope, decode_list},
    User,
};

use super::{api_failure, print_json, Context};
use crate::cli::UserCommands;

/// Dispatch a `users` subcommand.
pub async fn run(ctx: &Context, command: UserCommands) -> Result<()> {
    match command {
        UserCommands::List => {
            let response = ctx.api.users().list().await.map_err(api_failure)?;
            let (users, _) = decode_list::<User>(response.body)?;
            print_json(&users)
        },
        UserCommands::Get {
            id,
        } => {
            let response = ctx.api.users().get(&id).await.map_err(api_failure)?;
            let user = decode_envelope::<User>(response.body)?.data;
            print_json(&user)
        },
    }
}
