//! Integration tests for the Diesel access-token store against embedded PostgreSQL.

use chrono::{DateTime, Duration, TimeZone, Utc};
use hotel_booking::domain::ports::{AccessTokenRepository, NewUser, UserRepository};
use hotel_booking::domain::{EmailAddress, FullName, PasswordHash, PhoneNumber, UserId};
use hotel_booking::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::test_cluster;
use support::{handle_cluster_setup_failure, reset_database};

const TEST_DB: &str = "diesel_access_tokens_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    repository: DieselUserRepository,
    guest: UserId,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    runtime
        .block_on(run_pending_migrations(&database_url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(&database_url).with_max_size(2)))
        .map_err(|err| err.to_string())?;
    let repository = DieselUserRepository::new(pool);

    let guest = runtime
        .block_on(repository.insert(&NewUser {
            name: FullName::new("Ravi Kumar").map_err(|err| err.to_string())?,
            email: EmailAddress::new("ravi@example.com").map_err(|err| err.to_string())?,
            phone: PhoneNumber::new("9123456780").map_err(|err| err.to_string())?,
            password_hash: PasswordHash::from_stored("salt$digest"),
            created_at: now(),
        }))
        .map_err(|err| err.to_string())?
        .id;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        repository,
        guest,
    })
}

#[fixture]
fn token_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn purge_removes_only_expired_digests(token_context: Option<TestContext>) {
    let Some(context) = token_context else {
        eprintln!("SKIP-TEST-CLUSTER: purge_removes_only_expired_digests skipped");
        return;
    };
    let repository = &context.repository;

    context.runtime.block_on(async {
        repository
            .store("stale-a", context.guest, now() - Duration::hours(2))
            .await
            .expect("stored");
        repository
            .store("stale-b", context.guest, now())
            .await
            .expect("stored");
        repository
            .store("fresh", context.guest, now() + Duration::hours(1))
            .await
            .expect("stored");

        assert_eq!(repository.purge_expired(now()).await.expect("purge"), 2);
        assert_eq!(repository.purge_expired(now()).await.expect("purge"), 0);
        assert_eq!(
            repository.find_active("fresh", now()).await.expect("lookup"),
            Some(context.guest)
        );
        assert_eq!(
            repository.find_active("stale-a", now()).await.expect("lookup"),
            None
        );
    });
}
