use chrono::Utc;
use tracing::info;

use murmur_domain::id::UserId;
use murmur_domain::pagination::PageRequest;

use crate::domain::policy::{authorize_destroy_user, authorize_edit_profile};
use crate::domain::repository::{MicropostRepository, RelationshipRepository, UserRepository};
use crate::domain::types::{
    FollowCounts, Micropost, Rule, User, ValidationErrors, normalize_email, validate_email,
    validate_name, validate_password,
};
use crate::error::SocialServiceError;
use crate::usecase::credential::set_password;

/// Flag `email: taken` if another account already owns `email`.
async fn check_email_free<R: UserRepository>(
    repo: &R,
    email: &str,
    owner: Option<UserId>,
    errors: &mut ValidationErrors,
) -> Result<(), SocialServiceError> {
    if email.is_empty() {
        return Ok(());
    }
    if let Some(existing) = repo.find_by_email(email).await? {
        if Some(existing.id) != owner {
            errors.add("email", Rule::Taken);
        }
    }
    Ok(())
}

// ── SignUp ───────────────────────────────────────────────────────────────────

pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

pub struct SignUpUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SignUpUseCase<R> {
    pub async fn execute(&self, input: SignUpInput) -> Result<User, SocialServiceError> {
        let email = normalize_email(&input.email);
        let mut errors = ValidationErrors::new();
        validate_name(&input.name, &mut errors);
        validate_email(&email, &mut errors);
        check_email_free(&self.repo, &email, None, &mut errors).await?;
        validate_password(&input.password, &input.password_confirmation, &mut errors);
        errors.into_result()?;

        let now = Utc::now();
        let mut user = User {
            id: UserId::generate(),
            name: input.name.trim().to_owned(),
            email,
            password: None,
            admin: false,
            created_at: now,
            updated_at: now,
        };
        set_password(&mut user, &input.password);
        self.repo.create(&user).await?;
        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: UserId) -> Result<User, SocialServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(SocialServiceError::UserNotFound)
    }
}

// ── FindUserByEmail ──────────────────────────────────────────────────────────

pub struct FindUserByEmailUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> FindUserByEmailUseCase<R> {
    pub async fn execute(&self, email: &str) -> Result<User, SocialServiceError> {
        self.repo
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(SocialServiceError::UserNotFound)
    }
}

// ── ShowUser ─────────────────────────────────────────────────────────────────

/// A profile page: the user, their follow totals and a page of their posts.
pub struct UserProfile {
    pub user: User,
    pub counts: FollowCounts,
    pub microposts: Vec<Micropost>,
}

pub struct ShowUserUseCase<U, G, M>
where
    U: UserRepository,
    G: RelationshipRepository,
    M: MicropostRepository,
{
    pub users: U,
    pub relationships: G,
    pub microposts: M,
}

impl<U, G, M> ShowUserUseCase<U, G, M>
where
    U: UserRepository,
    G: RelationshipRepository,
    M: MicropostRepository,
{
    pub async fn execute(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<UserProfile, SocialServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(SocialServiceError::UserNotFound)?;
        let counts = self.relationships.counts(user.id).await?;
        let microposts = self.microposts.list_by_user(user.id, page).await?;
        Ok(UserProfile {
            user,
            counts,
            microposts,
        })
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, SocialServiceError> {
        self.repo.list(page.clamped()).await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

/// Absent fields are left alone. The password is only touched when either
/// password field is non-blank.
#[derive(Default)]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl UpdateUserInput {
    fn changes_password(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.password) || filled(&self.password_confirmation)
    }
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(
        &self,
        actor: &User,
        target: UserId,
        input: UpdateUserInput,
    ) -> Result<User, SocialServiceError> {
        authorize_edit_profile(actor, target)?;
        let mut user = self
            .repo
            .find_by_id(target)
            .await?
            .ok_or(SocialServiceError::UserNotFound)?;

        let mut errors = ValidationErrors::new();
        if let Some(ref name) = input.name {
            validate_name(name, &mut errors);
        }
        let email = input.email.as_deref().map(normalize_email);
        if let Some(ref email) = email {
            validate_email(email, &mut errors);
            check_email_free(&self.repo, email, Some(user.id), &mut errors).await?;
        }
        let changes_password = input.changes_password();
        let password = input.password.unwrap_or_default();
        if changes_password {
            let confirmation = input.password_confirmation.unwrap_or_default();
            validate_password(&password, &confirmation, &mut errors);
        }
        errors.into_result()?;

        if let Some(name) = input.name {
            user.name = name.trim().to_owned();
        }
        if let Some(email) = email {
            user.email = email;
        }
        if changes_password {
            set_password(&mut user, &password);
        }
        user.updated_at = Utc::now();
        self.repo.update(&user).await?;
        Ok(user)
    }
}

// ── DestroyUser ──────────────────────────────────────────────────────────────

pub struct DestroyUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DestroyUserUseCase<R> {
    /// Policy runs before the target is looked up.
    pub async fn execute(&self, actor: &User, target: UserId) -> Result<(), SocialServiceError> {
        authorize_destroy_user(actor, target)?;
        if !self.repo.destroy_cascade(target).await? {
            return Err(SocialServiceError::UserNotFound);
        }
        info!(user_id = %target, actor_id = %actor.id, "user destroyed");
        Ok(())
    }
}
