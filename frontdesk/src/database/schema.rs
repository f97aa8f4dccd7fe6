//! Table definitions for every SQL-backed program.
//!
//! All programs share one database file; table names carry the program
//! prefix so that, for instance, hospital and clinic patients never mix.

/// Current schema version stored in the metadata table.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Key-value metadata (schema version).
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Reads the stored schema version.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// Writes the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Every table and index, in dependency order.
pub const CREATE_STATEMENTS: &[&str] = &[
    CREATE_METADATA_TABLE,
    // students
    r"CREATE TABLE IF NOT EXISTS students (
        student_id TEXT PRIMARY KEY NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        course TEXT NOT NULL,
        year_level INTEGER NOT NULL CHECK (year_level BETWEEN 1 AND 5)
    )",
    "CREATE INDEX IF NOT EXISTS idx_students_course ON students(course)",
    // inventory
    r"CREATE TABLE IF NOT EXISTS inventory_products (
        product_id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        unit_price_cents INTEGER NOT NULL CHECK (unit_price_cents > 0)
    )",
    // hospital
    r"CREATE TABLE IF NOT EXISTS hospital_patients (
        patient_id TEXT PRIMARY KEY NOT NULL,
        full_name TEXT NOT NULL,
        age INTEGER NOT NULL CHECK (age > 0),
        gender TEXT NOT NULL CHECK (gender IN ('Male', 'Female')),
        diagnosis TEXT NOT NULL,
        admission_date TEXT NOT NULL,
        discharge_date TEXT
    )",
    // bank
    r"CREATE TABLE IF NOT EXISTS bank_accounts (
        account_number TEXT PRIMARY KEY NOT NULL,
        holder TEXT NOT NULL,
        kind TEXT NOT NULL CHECK (kind IN ('Savings', 'Checking')),
        balance_cents INTEGER NOT NULL
    )",
    // cart
    r"CREATE TABLE IF NOT EXISTS cart_items (
        product_id TEXT PRIMARY KEY NOT NULL COLLATE NOCASE,
        name TEXT NOT NULL,
        category TEXT NOT NULL CHECK (category IN ('Electronics', 'Clothing', 'Grocery')),
        price_cents INTEGER NOT NULL CHECK (price_cents > 0)
    )",
    // personnel
    r"CREATE TABLE IF NOT EXISTS personnel (
        person_id TEXT PRIMARY KEY NOT NULL COLLATE NOCASE,
        name TEXT NOT NULL,
        age INTEGER NOT NULL CHECK (age > 0),
        role TEXT NOT NULL CHECK (role IN ('Teacher', 'Student', 'AdminStaff')),
        detail TEXT NOT NULL,
        year_level INTEGER
    )",
    // transport
    r"CREATE TABLE IF NOT EXISTS transport_trips (
        trip_id TEXT PRIMARY KEY NOT NULL,
        route TEXT NOT NULL,
        trip_date TEXT NOT NULL,
        trip_time TEXT NOT NULL,
        total_seats INTEGER NOT NULL CHECK (total_seats > 0),
        available_seats INTEGER NOT NULL
            CHECK (available_seats >= 0 AND available_seats <= total_seats),
        fare_cents INTEGER NOT NULL CHECK (fare_cents >= 0)
    )",
    r"CREATE TABLE IF NOT EXISTS transport_reservations (
        reservation_id TEXT PRIMARY KEY NOT NULL,
        passenger_name TEXT NOT NULL,
        contact TEXT NOT NULL,
        trip_id TEXT NOT NULL REFERENCES transport_trips(trip_id),
        seat_no INTEGER NOT NULL,
        payment TEXT NOT NULL CHECK (payment IN ('Paid', 'Unpaid')),
        UNIQUE (trip_id, seat_no)
    )",
    // clinic
    r"CREATE TABLE IF NOT EXISTS clinic_doctors (
        doctor_id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        specialization TEXT NOT NULL,
        slots TEXT NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS clinic_patients (
        patient_id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        contact TEXT NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS clinic_appointments (
        appointment_id TEXT PRIMARY KEY NOT NULL,
        patient_id TEXT NOT NULL REFERENCES clinic_patients(patient_id),
        doctor_id TEXT NOT NULL REFERENCES clinic_doctors(doctor_id),
        appointment_date TEXT NOT NULL,
        timeslot TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('Scheduled', 'Cancelled', 'Completed'))
    )",
    r"CREATE UNIQUE INDEX IF NOT EXISTS idx_clinic_appointments_slot
        ON clinic_appointments(doctor_id, appointment_date, timeslot)
        WHERE status = 'Scheduled'",
    // rental
    r"CREATE TABLE IF NOT EXISTS rental_cars (
        plate TEXT PRIMARY KEY NOT NULL,
        model TEXT NOT NULL,
        kind TEXT NOT NULL CHECK (kind IN ('Economy', 'SUV', 'Luxury')),
        daily_rate_cents INTEGER NOT NULL CHECK (daily_rate_cents > 0),
        status TEXT NOT NULL CHECK (status IN ('Available', 'Rented'))
    )",
    r"CREATE TABLE IF NOT EXISTS rental_customers (
        customer_id TEXT PRIMARY KEY NOT NULL,
        full_name TEXT NOT NULL,
        license TEXT NOT NULL UNIQUE,
        contact TEXT NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS rental_rentals (
        rental_id TEXT PRIMARY KEY NOT NULL,
        customer_id TEXT NOT NULL REFERENCES rental_customers(customer_id),
        plate TEXT NOT NULL REFERENCES rental_cars(plate),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        total_fee_cents INTEGER NOT NULL
    )",
    // library
    r"CREATE TABLE IF NOT EXISTS library_books (
        book_id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        year INTEGER NOT NULL CHECK (year > 0),
        status TEXT NOT NULL CHECK (status IN ('Available', 'Borrowed'))
    )",
    r"CREATE TABLE IF NOT EXISTS library_loans (
        loan_id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id TEXT NOT NULL REFERENCES library_books(book_id),
        borrower TEXT NOT NULL,
        borrowed_on TEXT NOT NULL,
        returned_on TEXT
    )",
    r"CREATE UNIQUE INDEX IF NOT EXISTS idx_library_loans_open
        ON library_loans(book_id) WHERE returned_on IS NULL",
];
