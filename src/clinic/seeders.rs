//! Built-in demo data
//!
//! Collections start from these records when `storage.seed_demo_data` is on.
//! Persisted collections only use them when their key is absent.

use crate::models::{
    Appointment, AppointmentStatus, Doctor, Invoice, LineItem, MedicalRecord, Patient, PatientStatus, Report,
    TimeSlot, Visit, WeeklyHours,
};

fn hours(day: &str, from: &str, to: &str) -> WeeklyHours {
    WeeklyHours {
        day: day.to_string(),
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn slot(id: &str, date: &str, start: &str, end: &str) -> TimeSlot {
    TimeSlot {
        id: id.to_string(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        available: true,
    }
}

pub fn demo_doctors() -> Vec<Doctor> {
    // (id, first, last, speciality, department, education, years, rating, weekly hours, slots)
    let doctors = vec![
        (
            1,
            "Sara",
            "Khan",
            "Cardiology",
            "Heart Center",
            "MD, Harvard Medical School",
            15,
            4.9,
            vec![hours("Mon", "09:00", "13:00"), hours("Wed", "14:00", "18:00")],
            vec![
                slot("1", "2026-01-15", "09:00", "10:00"),
                slot("2", "2026-01-15", "14:00", "15:00"),
                slot("3", "2026-01-16", "10:00", "11:00"),
            ],
        ),
        (
            2,
            "Ahmed",
            "Malik",
            "Dermatology",
            "Skin Clinic",
            "MBBS, King Edward Medical University",
            12,
            4.8,
            vec![hours("Tue", "10:00", "16:00"), hours("Thu", "09:00", "12:00")],
            vec![
                slot("4", "2026-01-15", "11:00", "12:00"),
                slot("5", "2026-01-16", "09:00", "10:00"),
            ],
        ),
        (
            3,
            "Emily",
            "Rodriguez",
            "Pediatrics",
            "Children's Health",
            "MD, Johns Hopkins University",
            10,
            4.7,
            vec![hours("Fri", "09:00", "15:00")],
            vec![
                slot("6", "2026-01-17", "13:00", "14:00"),
                slot("7", "2026-01-18", "10:00", "11:00"),
            ],
        ),
    ];

    doctors
        .into_iter()
        .map(
            |(id, first, last, speciality, department, education, years, rating, availability, slots)| Doctor {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                speciality: speciality.to_string(),
                department: Some(department.to_string()),
                education: Some(education.to_string()),
                experience_years: Some(years),
                rating: Some(rating),
                availability,
                slots,
            },
        )
        .collect()
}

fn visit(date: &str, reason: &str, initial: bool, last_doctor: Option<&str>, prescription: &str) -> Visit {
    Visit {
        date: date.to_string(),
        reason: reason.to_string(),
        initial,
        last_doctor: last_doctor.map(str::to_string),
        prescription: Some(prescription.to_string()),
    }
}

fn report(id: &str, title: &str, date: &str, note: &str) -> Report {
    Report {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        note: Some(note.to_string()),
    }
}

pub fn demo_patients() -> Vec<Patient> {
    // (id, first, last, email, phone, age, gender, summary, visits, reports)
    let patients = vec![
        (
            1,
            "John",
            "Doe",
            "john@example.com",
            Some("+92-300-0000000"),
            Some(44),
            "M",
            "Complains of chest pain and shortness of breath. Referred for ECG.",
            vec![visit(
                "2025-10-10",
                "Initial consult - chest pain",
                true,
                None,
                "Aspirin 75mg once daily",
            )],
            vec![report("r1", "ECG Report", "2025-10-11", "Normal sinus rhythm")],
        ),
        (
            2,
            "Ayesha",
            "Raza",
            "ayesha@example.com",
            Some("+92-300-1111111"),
            Some(31),
            "F",
            "Follow-up for eczema. Uses topical steroid occasionally.",
            vec![visit(
                "2025-09-20",
                "Follow-up for eczema",
                false,
                Some("Dr. Ahmed Malik"),
                "Hydrocortisone cream 1% - apply twice daily",
            )],
            vec![],
        ),
        (
            3,
            "Sarah",
            "Connor",
            "sarah.connor@example.com",
            None,
            Some(29),
            "F",
            "Hypertension follow-up; on Amlodipine 5mg.",
            vec![visit("2025-10-15", "Blood pressure review", false, Some("Dr. Sara Khan"), "Amlodipine 5mg")],
            vec![report("r2", "BP Report", "2025-09-11", "Stable")],
        ),
        (
            4,
            "Liam",
            "Walker",
            "liam.walker@example.com",
            None,
            Some(42),
            "M",
            "Chest pain evaluation; referred from ER.",
            vec![visit("2025-10-07", "Chest pain evaluation", true, None, "Nitroglycerin as needed")],
            vec![report("r3", "ECG Report", "2025-08-03", "Normal")],
        ),
        (
            5,
            "Jessica",
            "Martin",
            "jessica.martin@example.com",
            None,
            Some(41),
            "F",
            "ENT follow-up for sinus issues.",
            vec![visit("2025-09-17", "Sinus congestion", false, Some("Dr. Emily Rodriguez"), "Fluticasone nasal spray")],
            vec![report("r4", "Sinus CT", "2025-06-09", "Mucosal thickening")],
        ),
        (
            6,
            "Carlos",
            "Mendez",
            "carlos.mendez@example.com",
            None,
            Some(38),
            "M",
            "Cholesterol follow-up; on Rosuvastatin.",
            vec![visit("2025-09-07", "Lipid review", false, Some("Dr. Sara Khan"), "Rosuvastatin 10mg")],
            vec![report("r5", "Lipid Panel", "2025-06-12", "Improved")],
        ),
        (
            7,
            "Emily",
            "Brown",
            "emily.brown@example.com",
            None,
            Some(31),
            "F",
            "Anxiety follow-up; on Sertraline.",
            vec![visit("2025-10-12", "Anxiety follow-up", false, None, "Sertraline 50mg")],
            vec![report("r6", "Psych Eval", "2025-09-15", "Responding well")],
        ),
    ];

    patients
        .into_iter()
        .map(
            |(id, first, last, email, phone, age, gender, summary, visits, reports)| Patient {
                id,
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                phone: phone.map(str::to_string),
                status: PatientStatus::Active,
                summary: summary.to_string(),
                age,
                gender: Some(gender.to_string()),
                visits,
                reports,
            },
        )
        .collect()
}

fn line(id: i64, description: &str, unit: u64) -> LineItem {
    LineItem {
        id,
        description: description.to_string(),
        qty: 1,
        unit,
    }
}

pub fn demo_invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: 1,
            invoice_no: "INV-1001".to_string(),
            patient_name: "John Doe".to_string(),
            date: "2025-10-10".to_string(),
            items: vec![
                line(1, "Consultation (30 mins)", 1500),
                line(2, "ECG", 800),
                line(3, "Blood test (CBC)", 600),
            ],
            paid: false,
        },
        Invoice {
            id: 2,
            invoice_no: "INV-1002".to_string(),
            patient_name: "Ayesha Raza".to_string(),
            date: "2025-09-20".to_string(),
            items: vec![line(1, "Dermatology consult", 1200), line(2, "Topical medication", 400)],
            paid: true,
        },
    ]
}

pub fn demo_appointments() -> Vec<Appointment> {
    // (id, patient id, patient, doctor id, doctor, specialty, date, time, status, reason)
    let appointments = vec![
        ("a1", "john@example.com", "John Doe", "1", "Dr. Sara Khan", "Cardiology", "2025-10-22", "10:00", AppointmentStatus::Scheduled, "Chest pain follow-up"),
        ("a2", "mary@example.com", "Mary Ali", "2", "Dr. Ahmed Malik", "Dermatology", "2025-10-23", "11:30", AppointmentStatus::Scheduled, "Rash"),
        ("a3", "ali@example.com", "Ali Rehman", "1", "Dr. Sara Khan", "Cardiology", "2025-10-24", "09:00", AppointmentStatus::Scheduled, "ECG review"),
        ("a4", "fatima@example.com", "Fatima Noor", "3", "Dr. Emily Rodriguez", "Pediatrics", "2025-10-25", "14:15", AppointmentStatus::Scheduled, "Child vaccination"),
        ("a5", "omar@example.com", "Omar Siddiqui", "2", "Dr. Ahmed Malik", "Dermatology", "2025-10-26", "13:00", AppointmentStatus::Cancelled, "Acne treatment"),
        ("a6", "ayesha.khan@example.com", "Ayesha Khan", "1", "Dr. Sara Khan", "Cardiology", "2025-10-27", "15:30", AppointmentStatus::Scheduled, "Palpitations"),
        ("p1", "patient@demo.test", "Patient Demo", "1", "Dr. Sara Khan", "Cardiology", "2026-01-20", "10:00", AppointmentStatus::Scheduled, "Regular heart checkup"),
        ("p2", "patient@demo.test", "Patient Demo", "2", "Dr. Ahmed Malik", "Dermatology", "2026-01-25", "14:00", AppointmentStatus::Scheduled, "Skin consultation"),
    ];

    appointments
        .into_iter()
        .map(
            |(id, patient_id, patient, doctor_id, doctor, specialty, date, time, status, reason)| Appointment {
                id: id.to_string(),
                patient_id: patient_id.to_string(),
                patient_name: patient.to_string(),
                doctor_id: doctor_id.to_string(),
                doctor_name: doctor.to_string(),
                doctor_specialty: Some(specialty.to_string()),
                date: date.to_string(),
                time: time.to_string(),
                status,
                reason: reason.to_string(),
                notes: None,
            },
        )
        .collect()
}

pub fn demo_medical_records() -> Vec<MedicalRecord> {
    vec![
        MedicalRecord {
            id: "1".to_string(),
            date: "2026-01-10".to_string(),
            doctor: "Dr. Sara Khan".to_string(),
            diagnosis: "Hypertension".to_string(),
            treatment: "Medication and lifestyle changes".to_string(),
            prescriptions: vec!["Lisinopril 10mg".to_string(), "Amlodipine 5mg".to_string()],
        },
        MedicalRecord {
            id: "2".to_string(),
            date: "2025-12-15".to_string(),
            doctor: "Dr. Ahmed Malik".to_string(),
            diagnosis: "Contact dermatitis".to_string(),
            treatment: "Topical therapy".to_string(),
            prescriptions: vec!["Hydrocortisone cream 1%".to_string()],
        },
    ]
}
