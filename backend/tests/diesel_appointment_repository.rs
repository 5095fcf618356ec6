//! Integration tests for `DieselAppointmentRepository` against embedded
//! PostgreSQL.
//!
//! Steps stay synchronous and drive the async repositories through one Tokio
//! runtime owned by the world, mirroring how the other Diesel suites run.

use std::sync::{Arc, Mutex};

use careplus::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, DoctorRepository, SpecialtyRepository,
    UserRepository,
};
use careplus::domain::{
    AppointmentDate, AppointmentDetails, AppointmentId, AppointmentStatus, BookingRequest,
    CancelOutcome, DoctorDraft, DoctorId, DoctorMetrics, DoctorProfileText, EmailAddress,
    IntakeForm, NewAccount, NewBooking, PasswordHash, PersonName, Role, SlotTime, UserId,
};
use careplus::outbound::persistence::{
    DbPool, DieselAppointmentRepository, DieselDoctorRepository, DieselSpecialtyRepository,
    DieselUserRepository, PoolConfig,
};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, provision_test_database};

const BOOKING_DAY: &str = "2030-03-14";

struct World {
    runtime: Runtime,
    appointments: DieselAppointmentRepository,
    doctor_id: DoctorId,
    patient_id: UserId,
    other_patient_id: UserId,
    last_booking: Option<Result<AppointmentDetails, AppointmentRepositoryError>>,
    last_cancel: Option<CancelOutcome>,
    database: TestDatabase,
}

type SharedWorld = Arc<Mutex<World>>;

fn account(runtime: &Runtime, users: &DieselUserRepository, email: &str) -> Result<UserId, String> {
    let account = NewAccount {
        email: EmailAddress::new(email).map_err(|err| err.to_string())?,
        name: PersonName::new("Test Patient").map_err(|err| err.to_string())?,
        role: Role::Patient,
        password_hash: PasswordHash::new("$2b$04$not-a-real-hash"),
    };
    runtime
        .block_on(users.create(&account))
        .map(|user| user.id())
        .map_err(|err| err.to_string())
}

fn setup_world() -> Result<World, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let database = provision_test_database()?;
    let pool = runtime
        .block_on(DbPool::new(
            PoolConfig::new(database.url())
                .with_max_size(4)
                .with_min_idle(Some(1)),
        ))
        .map_err(|err| err.to_string())?;

    let users = DieselUserRepository::new(pool.clone());
    let patient_id = account(&runtime, &users, "patient@clinic.test")?;
    let other_patient_id = account(&runtime, &users, "other@clinic.test")?;

    let specialty = runtime
        .block_on(DieselSpecialtyRepository::new(pool.clone()).list())
        .map_err(|err| err.to_string())?
        .into_iter()
        .next()
        .ok_or("specialty seed missing")?;
    let draft = DoctorDraft {
        name: PersonName::new("Dr. Sokolova").map_err(|err| err.to_string())?,
        specialty_id: specialty.id,
        text: DoctorProfileText::default(),
        metrics: DoctorMetrics {
            consultation_price: Some(2500),
            ..DoctorMetrics::default()
        },
    };
    let doctor = runtime
        .block_on(DieselDoctorRepository::new(pool.clone()).create(&draft))
        .map_err(|err| err.to_string())?;

    Ok(World {
        runtime,
        appointments: DieselAppointmentRepository::new(pool),
        doctor_id: doctor.id,
        patient_id,
        other_patient_id,
        last_booking: None,
        last_cancel: None,
        database,
    })
}

#[fixture]
fn world() -> Option<SharedWorld> {
    match setup_world() {
        Ok(world) => Some(Arc::new(Mutex::new(world))),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn booking(doctor_id: DoctorId, patient_id: UserId, time: &str) -> NewBooking {
    let date: AppointmentDate = BOOKING_DAY.parse().expect("valid date");
    NewBooking {
        patient_id,
        request: BookingRequest {
            doctor_id,
            date,
            time: SlotTime::parse_bookable(time).expect("on grid"),
            intake: IntakeForm::new("persistent cough", None, Some(180), Some(75), None)
                .expect("valid intake"),
        },
    }
}

fn book_as(world: &SharedWorld, patient: fn(&World) -> UserId, time: &str) {
    let mut w = world.lock().expect("world lock");
    let request = booking(w.doctor_id, patient(&w), time);
    let result = w.runtime.block_on(w.appointments.book(&request));
    w.last_booking = Some(result);
}

fn booked_times(world: &SharedWorld) -> Vec<String> {
    let w = world.lock().expect("world lock");
    let date: AppointmentDate = BOOKING_DAY.parse().expect("valid date");
    w.runtime
        .block_on(w.appointments.booked_times(w.doctor_id, date))
        .expect("booked times")
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn last_booked_id(world: &SharedWorld) -> AppointmentId {
    let w = world.lock().expect("world lock");
    match w.last_booking.as_ref().expect("a booking was attempted") {
        Ok(details) => details.id,
        Err(err) => panic!("booking failed: {err}"),
    }
}

// -----------------------------------------------------------------------------
// Steps
// -----------------------------------------------------------------------------

#[given("the patient holds the 10:00 slot")]
fn the_patient_holds_the_ten_oclock_slot(world: SharedWorld) {
    book_as(&world, |w| w.patient_id, "10:00");
    last_booked_id(&world);
}

#[when("another patient books the same slot")]
fn another_patient_books_the_same_slot(world: SharedWorld) {
    book_as(&world, |w| w.other_patient_id, "10:00");
}

#[when("several patients race for the 10:00 slot")]
fn several_patients_race_for_the_slot(
    world: SharedWorld,
) -> Vec<Result<AppointmentDetails, AppointmentRepositoryError>> {
    let w = world.lock().expect("world lock");
    let contenders: Vec<NewBooking> = [w.patient_id, w.other_patient_id]
        .into_iter()
        .cycle()
        .take(4)
        .map(|patient| booking(w.doctor_id, patient, "10:00"))
        .collect();
    let appointments = &w.appointments;
    w.runtime.block_on(async {
        let (a, b, c, d) = tokio::join!(
            appointments.book(&contenders[0]),
            appointments.book(&contenders[1]),
            appointments.book(&contenders[2]),
            appointments.book(&contenders[3]),
        );
        vec![a, b, c, d]
    })
}

#[when("the patient cancels the booking")]
fn the_patient_cancels_the_booking(world: SharedWorld, id: AppointmentId) {
    let mut w = world.lock().expect("world lock");
    let outcome = w
        .runtime
        .block_on(w.appointments.cancel(id, w.patient_id))
        .expect("cancel runs");
    w.last_cancel = Some(outcome);
}

#[then("the booking is rejected because the slot is taken")]
fn the_booking_is_rejected(world: SharedWorld) {
    let w = world.lock().expect("world lock");
    assert!(
        matches!(w.last_booking, Some(Err(AppointmentRepositoryError::SlotTaken))),
        "expected SlotTaken, got {:?}",
        w.last_booking
    );
}

#[then("the booking succeeds")]
fn the_booking_succeeds(world: SharedWorld) {
    let w = world.lock().expect("world lock");
    let details = match w.last_booking.as_ref() {
        Some(Ok(details)) => details,
        other => panic!("expected a booking, got {other:?}"),
    };
    assert_eq!(details.status, AppointmentStatus::Pending);
    assert_eq!(details.doctor_name, "Dr. Sokolova");
    assert_eq!(details.consultation_price, 2500);
}

#[then("exactly one racer wins and the rest see the slot taken")]
fn exactly_one_racer_wins(outcomes: Vec<Result<AppointmentDetails, AppointmentRepositoryError>>) {
    let winners = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(winners, 1, "outcomes: {outcomes:?}");
    assert!(
        outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .all(|err| matches!(err, AppointmentRepositoryError::SlotTaken)),
        "outcomes: {outcomes:?}"
    );
}

#[then("the cancellation outcome is already cancelled")]
fn the_outcome_is_already_cancelled(world: SharedWorld) {
    let w = world.lock().expect("world lock");
    assert!(matches!(w.last_cancel, Some(CancelOutcome::AlreadyCancelled)));
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[rstest]
fn a_taken_slot_cannot_be_booked_twice(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    the_patient_holds_the_ten_oclock_slot(world.clone());
    another_patient_books_the_same_slot(world.clone());
    the_booking_is_rejected(world.clone());
    assert_eq!(booked_times(&world), vec!["10:00:00".to_owned()]);
}

#[rstest]
fn cancelling_frees_the_slot(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    the_patient_holds_the_ten_oclock_slot(world.clone());
    let id = last_booked_id(&world);
    the_patient_cancels_the_booking(world.clone(), id);
    assert!(booked_times(&world).is_empty());

    another_patient_books_the_same_slot(world.clone());
    the_booking_succeeds(world);
}

#[rstest]
fn cancelling_twice_reports_already_cancelled(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    the_patient_holds_the_ten_oclock_slot(world.clone());
    let id = last_booked_id(&world);
    the_patient_cancels_the_booking(world.clone(), id);
    the_patient_cancels_the_booking(world.clone(), id);
    the_outcome_is_already_cancelled(world);
}

#[rstest]
fn other_patients_cannot_cancel(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    the_patient_holds_the_ten_oclock_slot(world.clone());
    let id = last_booked_id(&world);
    let w = world.lock().expect("world lock");
    let outcome = w
        .runtime
        .block_on(w.appointments.cancel(id, w.other_patient_id))
        .expect("cancel runs");

    assert!(matches!(outcome, CancelOutcome::NotFound));
}

#[rstest]
fn patient_listing_is_newest_slot_first(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    book_as(&world, |w| w.patient_id, "09:00");
    book_as(&world, |w| w.patient_id, "15:30");
    book_as(&world, |w| w.other_patient_id, "11:00");

    let w = world.lock().expect("world lock");
    let mine = w
        .runtime
        .block_on(w.appointments.list_for_patient(w.patient_id))
        .expect("listing");
    let times: Vec<String> = mine.iter().map(|a| a.time.to_string()).collect();
    assert_eq!(times, vec!["15:30:00", "09:00:00"]);
    assert!(mine.iter().all(|a| a.patient_email == "patient@clinic.test"));

    let everything = w.runtime.block_on(w.appointments.list_all()).expect("listing");
    assert_eq!(everything.len(), 3);
}

#[rstest]
fn booking_an_unknown_doctor_is_reported(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    let w = world.lock().expect("world lock");
    let request = booking(DoctorId::new(999_999).expect("id"), w.patient_id, "12:00");
    let err = w
        .runtime
        .block_on(w.appointments.book(&request))
        .expect_err("unknown doctor");

    assert!(matches!(err, AppointmentRepositoryError::DoctorMissing));
}

#[rstest]
fn concurrent_bookings_assign_the_slot_once(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    let outcomes = several_patients_race_for_the_slot(world.clone());
    exactly_one_racer_wins(outcomes);
    assert_eq!(booked_times(&world), vec!["10:00:00".to_owned()]);
}

#[rstest]
fn active_slot_index_rejects_a_second_live_row(world: Option<SharedWorld>) {
    let Some(world) = world else {
        return;
    };

    the_patient_holds_the_ten_oclock_slot(world.clone());
    let w = world.lock().expect("world lock");
    let insert = |status: &str| {
        format!(
            "INSERT INTO appointments \
             (user_id, doctor_id, appointment_date, appointment_time, status, complaints) \
             VALUES ({}, {}, '{BOOKING_DAY}', '10:00', '{status}', 'walk-in')",
            w.other_patient_id.get(),
            w.doctor_id.get(),
        )
    };

    let err = w
        .database
        .execute(&insert("pending"))
        .expect_err("second live row violates the index");
    assert!(err.contains("appointments_active_slot_idx"), "{err}");

    w.database
        .execute(&insert("cancelled"))
        .expect("cancelled rows do not hold the slot");
}
