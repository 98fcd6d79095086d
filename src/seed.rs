// seed.rs - Development sample data and bootstrap administrator grants

use tracing::{info, warn};
use uuid::Uuid;

use crate::database::models::{Board, User};
use crate::services::{Dump, ServiceResult};
use crate::state::AppState;

/// Name and password of every sample account; the first one is the administrator
pub const SAMPLE_ACCOUNTS: [(&str, &str); 6] = [
    ("Administrator", "password0"),
    ("Mod1", "password1"),
    ("Mod2", "password2"),
    ("Mod3", "password3"),
    ("regular_user", "password4"),
    ("regular_user2", "password5"),
];

fn sample_user(name: &str, password_hash: String) -> User {
    User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        bio: "Dictator".to_string(),
        avatar: "base64encodedfile".to_string(),
        pronouns: "over/lord".to_string(),
        email: "mail@mail.com".to_string(),
        password: password_hash,
    }
}

/// Inserts the sample accounts and a board moderated by the three Mod accounts.
///
/// Skipped when any user already exists, so restarts against a persistent
/// store do not duplicate data. Returns whether anything was inserted.
pub async fn seed_sample_data(state: &AppState) -> ServiceResult<bool> {
    if !state.users.list().await?.is_empty() {
        info!("users already present, skipping sample data");
        return Ok(false);
    }

    let mut users = Vec::with_capacity(SAMPLE_ACCOUNTS.len());
    for (name, password) in SAMPLE_ACCOUNTS {
        let hash = state.hashing.hash_blocking(password.to_string()).await?;
        users.push(sample_user(name, hash));
    }

    let board = Board {
        id: Uuid::new_v4(),
        name: "general".to_string(),
        bio: "Anything goes".to_string(),
        rules: "Be civil".to_string(),
        moderators: users[1..4].iter().map(|u| u.id).collect(),
        owner: users[0].id,
    };

    let dump = Dump {
        users,
        boards: vec![board],
        ..Default::default()
    };
    let report = state.transfer.import_unchecked(&dump).await?;
    info!(users = report.users, boards = report.boards, "sample data seeded");
    Ok(true)
}

/// Grants administrator rights to each named user that exists
pub async fn grant_bootstrap_admins(state: &AppState, names: &[String]) -> ServiceResult<usize> {
    let mut granted = 0;
    for name in names {
        match state.users.find_by_name(name).await? {
            Some(profile) => {
                if state.admins.grant(profile.id).await? {
                    granted += 1;
                }
            }
            None => warn!(%name, "bootstrap administrator does not exist"),
        }
    }
    Ok(granted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;
    use crate::config::AppConfig;
    use crate::database::MemoryStore;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(Arc::new(MemoryStore::new()), &AppConfig::development()).unwrap()
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let state = state();
        assert!(seed_sample_data(&state).await.unwrap());
        assert!(!seed_sample_data(&state).await.unwrap());
        assert_eq!(state.users.list().await.unwrap().len(), SAMPLE_ACCOUNTS.len());
        assert_eq!(state.boards.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seeded_accounts_can_authenticate_and_moderate() {
        let state = state();
        seed_sample_data(&state).await.unwrap();
        let granted = grant_bootstrap_admins(&state, &["Administrator".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert_eq!(granted, 1);

        let admin = state
            .authorizer
            .authenticate(&Credentials::new("Administrator", "password0"))
            .await
            .unwrap();
        assert!(admin.is_admin);

        let moderator = state
            .authorizer
            .authenticate(&Credentials::new("Mod2", "password2"))
            .await
            .unwrap();
        assert!(!moderator.is_admin);
        let board = &state.boards.list().await.unwrap()[0];
        assert!(crate::auth::is_moderator(board, moderator.id()));
    }
}
