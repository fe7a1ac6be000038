use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::league::CreateLeagueRequest;
use crate::error::{EngineResult, MembershipError, PreconditionError};
use crate::models::{League, LeagueMember};
use crate::repository::LeagueStore;

pub async fn create_league<L>(
    leagues: &L,
    owner_id: Uuid,
    request: &CreateLeagueRequest,
    now: DateTime<Utc>,
) -> EngineResult<League>
where
    L: LeagueStore + ?Sized,
{
    request.validate()?;

    let league = leagues
        .create_league(&League::new(request.name.as_str(), owner_id, now))
        .await?;

    info!(league_id = %league.league_id, owner_id = %owner_id, "League created");
    Ok(league)
}

/// Adds `user_id` to the league. Joining twice is a no-op and keeps the
/// original join time.
pub async fn add_member<L>(
    leagues: &L,
    league_id: Uuid,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> EngineResult<League>
where
    L: LeagueStore + ?Sized,
{
    let mut league = load(leagues, league_id).await?;
    if league.is_member(user_id) {
        return Ok(league);
    }

    let member = LeagueMember {
        user_id,
        joined_at: now,
    };
    leagues.add_member(league_id, &member).await?;
    league.members.push(member);

    Ok(league)
}

/// Removes `user_id` on behalf of `removed_by`, who must own the league.
/// The owner can never be removed.
pub async fn remove_member<L>(
    leagues: &L,
    league_id: Uuid,
    user_id: Uuid,
    removed_by: Uuid,
) -> EngineResult<()>
where
    L: LeagueStore + ?Sized,
{
    let league = load(leagues, league_id).await?;

    if removed_by != league.owner_id {
        return Err(MembershipError::NotOwner.into());
    }
    if user_id == league.owner_id {
        return Err(MembershipError::OwnerRemoval.into());
    }
    if !leagues.remove_member(league_id, user_id).await? {
        return Err(MembershipError::NotMember(user_id).into());
    }

    info!(league_id = %league_id, user_id = %user_id, "Member removed");
    Ok(())
}

pub async fn leagues_for_user<L>(leagues: &L, user_id: Uuid) -> EngineResult<Vec<League>>
where
    L: LeagueStore + ?Sized,
{
    Ok(leagues.list_leagues_for_user(user_id).await?)
}

async fn load<L>(leagues: &L, league_id: Uuid) -> EngineResult<League>
where
    L: LeagueStore + ?Sized,
{
    Ok(leagues
        .get_league(league_id)
        .await?
        .ok_or(PreconditionError::LeagueNotFound(league_id))?)
}
