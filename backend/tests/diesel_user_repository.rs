//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.

use careplus::domain::ports::{UserPersistenceError, UserRepository};
use careplus::domain::{
    EmailAddress, NewAccount, PasswordHash, PersonName, ProfileUpdate, Role, User,
};
use careplus::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, provision_test_database};

struct Harness {
    runtime: Runtime,
    users: DieselUserRepository,
    _database: TestDatabase,
}

fn setup() -> Result<Harness, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_test_database()?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(database.url()).with_max_size(2)))
        .map_err(|err| err.to_string())?;
    Ok(Harness {
        runtime,
        users: DieselUserRepository::new(pool),
        _database: database,
    })
}

#[fixture]
fn harness() -> Option<Harness> {
    match setup() {
        Ok(harness) => Some(harness),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn new_account(email: &str, role: Role) -> NewAccount {
    NewAccount {
        email: EmailAddress::new(email).expect("valid email"),
        name: PersonName::new("Ada Lovelace").expect("valid name"),
        role,
        password_hash: PasswordHash::new("$2b$04$stored-hash"),
    }
}

#[given("a registered patient")]
fn a_registered_patient(harness: &Harness) -> User {
    harness
        .runtime
        .block_on(harness.users.create(&new_account("ada@clinic.test", Role::Patient)))
        .expect("account created")
}

#[when("the same email registers again in different case")]
fn the_same_email_registers_again(harness: &Harness) -> Result<User, UserPersistenceError> {
    harness
        .runtime
        .block_on(harness.users.create(&new_account("  ADA@Clinic.Test ", Role::Patient)))
}

#[then("the repository reports a duplicate email")]
fn a_duplicate_email_is_reported(result: Result<User, UserPersistenceError>) {
    assert!(
        matches!(result, Err(UserPersistenceError::DuplicateEmail { .. })),
        "expected DuplicateEmail, got {result:?}"
    );
}

#[rstest]
fn duplicate_emails_are_rejected(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };

    a_registered_patient(&harness);
    let result = the_same_email_registers_again(&harness);
    a_duplicate_email_is_reported(result);
}

#[rstest]
fn credentials_are_found_by_normalised_email(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    let created = a_registered_patient(&harness);

    let lookup = EmailAddress::new("Ada@CLINIC.test").expect("valid email");
    let stored = harness
        .runtime
        .block_on(harness.users.find_credentials_by_email(&lookup))
        .expect("query")
        .expect("account exists");

    assert_eq!(stored.user.id(), created.id());
    assert_eq!(stored.password_hash.as_str(), "$2b$04$stored-hash");
    assert_eq!(stored.user.role(), Role::Patient);
}

#[rstest]
fn profile_updates_only_touch_supplied_fields(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    let created = a_registered_patient(&harness);

    let update = ProfileUpdate {
        phone: Some("+7 900 000 00 00".to_owned()),
        ..ProfileUpdate::default()
    };
    let updated = harness
        .runtime
        .block_on(harness.users.update_profile(created.id(), &update))
        .expect("query")
        .expect("account exists");

    assert_eq!(updated.name().as_str(), "Ada Lovelace");
    assert_eq!(updated.contact().phone.as_deref(), Some("+7 900 000 00 00"));
    assert!(updated.contact().address.is_none());
}

#[rstest]
fn email_change_to_a_taken_address_conflicts(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    a_registered_patient(&harness);
    let other = harness
        .runtime
        .block_on(harness.users.create(&new_account("grace@clinic.test", Role::Patient)))
        .expect("second account");

    let update = ProfileUpdate {
        email: Some(EmailAddress::new("ada@clinic.test").expect("valid email")),
        ..ProfileUpdate::default()
    };
    let result = harness
        .runtime
        .block_on(harness.users.update_profile(other.id(), &update))
        .map(|user| user.expect("account exists"));

    a_duplicate_email_is_reported(result);
}

#[rstest]
fn promoting_to_admin_persists_the_role(harness: Option<Harness>) {
    let Some(harness) = harness else {
        return;
    };
    let created = a_registered_patient(&harness);

    let promoted = harness
        .runtime
        .block_on(harness.users.set_role(created.id(), Role::Admin))
        .expect("query")
        .expect("account exists");
    let reloaded = harness
        .runtime
        .block_on(harness.users.find_by_id(created.id()))
        .expect("query")
        .expect("account exists");

    assert_eq!(promoted.role(), Role::Admin);
    assert_eq!(reloaded.role(), Role::Admin);
}
