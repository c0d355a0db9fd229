//! Profile orchestration.

use crate::store::follows::FollowGraphStore;
use crate::store::users::UserStore;
use quill_core::{Error, Profile, Result, User, UserId, Username};
use tracing::{info, instrument};

/// Public façade over profiles: the viewer-relative read projection and the
/// follow/unfollow mutations.
#[derive(Clone)]
pub struct ProfileRepository {
    users: UserStore,
    follows: FollowGraphStore,
}

impl ProfileRepository {
    /// Wire the repository from its collaborators.
    #[must_use]
    pub fn new(users: UserStore, follows: FollowGraphStore) -> Self {
        Self { users, follows }
    }

    /// Fetch a profile. The following flag is false without a viewer.
    pub async fn get(&self, username: &Username, viewer: Option<&UserId>) -> Result<Profile> {
        let user = self.lookup(username).await?;
        let following = match viewer {
            Some(viewer) => self.follows.is_following(viewer, &user.id).await?,
            None => false,
        };
        Ok(Self::to_profile(user, following))
    }

    /// Follow the named user. Idempotent.
    #[instrument(skip(self), fields(username = %username, follower = %follower))]
    pub async fn follow(&self, username: &Username, follower: &UserId) -> Result<Profile> {
        let user = self.lookup(username).await?;
        self.follows.follow(follower, &user.id).await?;
        info!(%username, "followed");
        Ok(Self::to_profile(user, true))
    }

    /// Unfollow the named user. Idempotent.
    #[instrument(skip(self), fields(username = %username, follower = %follower))]
    pub async fn unfollow(&self, username: &Username, follower: &UserId) -> Result<Profile> {
        let user = self.lookup(username).await?;
        self.follows.unfollow(follower, &user.id).await?;
        info!(%username, "unfollowed");
        Ok(Self::to_profile(user, false))
    }

    async fn lookup(&self, username: &Username) -> Result<User> {
        self.users
            .by_username(username)
            .await?
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    fn to_profile(user: User, following: bool) -> Profile {
        Profile {
            username: user.username,
            bio: user.bio,
            image: user.image,
            following,
        }
    }
}
