//! Wiring from the connection pool to the HTTP state's driving ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use careplus::domain::ports::{AuthenticationGate, UserDirectory};
use careplus::domain::{AccountService, AppointmentSchedulerService, DoctorDirectoryService};
use careplus::inbound::http::state::HttpState;
use careplus::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselDoctorRepository, DieselSpecialtyRepository,
    DieselUserRepository,
};
use careplus::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};

use super::ServerConfig;

/// Account service over the production adapters.
pub type Accounts = AccountService<DieselUserRepository, BcryptPasswordHasher, JwtTokenCodec>;

/// Build the account service shared by registration, login, and the
/// authentication gate.
pub fn build_account_service(config: &ServerConfig) -> Arc<Accounts> {
    Arc::new(AccountService::new(
        Arc::new(DieselUserRepository::new(config.db_pool.clone())),
        Arc::new(BcryptPasswordHasher::default()),
        Arc::new(config.tokens.clone()),
        Arc::new(DefaultClock),
        config.token_policy,
    ))
}

/// One service backs both account ports.
fn account_ports<S>(service: Arc<S>) -> (Arc<dyn UserDirectory>, Arc<dyn AuthenticationGate>)
where
    S: UserDirectory + AuthenticationGate + 'static,
{
    (
        service.clone() as Arc<dyn UserDirectory>,
        service as Arc<dyn AuthenticationGate>,
    )
}

fn doctor_repository(pool: &DbPool) -> Arc<DieselDoctorRepository> {
    Arc::new(DieselDoctorRepository::new(pool.clone()))
}

/// Build the shared HTTP state from the configured pool.
pub(super) fn build_http_state(
    config: &ServerConfig,
    accounts: Arc<Accounts>,
) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let (directory, gate) = account_ports(accounts);
    let doctors = DoctorDirectoryService::new(
        doctor_repository(pool),
        Arc::new(DieselSpecialtyRepository::new(pool.clone())),
    );
    let appointments = AppointmentSchedulerService::new(
        Arc::new(DieselAppointmentRepository::new(pool.clone())),
        doctor_repository(pool),
    );

    web::Data::new(HttpState::new(
        directory,
        gate,
        Arc::new(doctors),
        Arc::new(appointments),
    ))
}
