use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use shared::types::{SchoolYear, User, UserType, UserWithSchoolYear};
use staff_service::{
    config::PasswordConfig,
    domain::{
        school_year::SchoolYearRepository,
        service::StaffService,
        user::{NewUser, UserPatch, UserRepository, email_taken, rfid_taken},
    },
    error::StaffServiceError,
    infrastructure::password::Argon2PasswordHasher,
};

type SchoolYears = Arc<Mutex<HashMap<Uuid, SchoolYear>>>;

/// School years keyed by id.
#[derive(Clone, Default)]
pub struct InMemorySchoolYears {
    rows: SchoolYears,
}

impl InMemorySchoolYears {
    pub fn insert(&self, name: &str) -> Uuid {
        let now = Utc::now();
        let school_year = SchoolYear {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 5, 31).unwrap(),
            created_at: now,
            updated_at: now,
        };
        let id = school_year.id;
        self.rows.lock().unwrap().insert(id, school_year);
        id
    }
}

#[async_trait]
impl SchoolYearRepository for InMemorySchoolYears {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SchoolYear>, StaffServiceError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }
}

/// `users` table stand-in with the same unique constraints and the same
/// inner join against school years as the Postgres repository.
#[derive(Clone)]
pub struct InMemoryUsers {
    rows: Arc<Mutex<Vec<User>>>,
    school_years: SchoolYears,
}

impl InMemoryUsers {
    pub fn new(school_years: &InMemorySchoolYears) -> Self {
        Self {
            rows: Arc::default(),
            school_years: Arc::clone(&school_years.rows),
        }
    }

    pub fn all(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    /// Inserts an account directly, bypassing the service.
    pub fn insert_raw(
        &self,
        rfid: &str,
        email: &str,
        user_type: UserType,
        school_year_id: Option<Uuid>,
    ) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            rfid: rfid.to_string(),
            email: email.to_string(),
            password: "$argon2id$seeded".to_string(),
            name: "Seeded".to_string(),
            user_type,
            school_year_id,
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.rows.lock().unwrap().push(user);
        id
    }

    fn check_constraints(
        rows: &[User],
        skip: Option<Uuid>,
        rfid: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), StaffServiceError> {
        let others = || rows.iter().filter(move |u| Some(u.id) != skip);
        if let Some(rfid) = rfid
            && others().any(|u| u.rfid == rfid)
        {
            return Err(StaffServiceError::Validation(vec![rfid_taken(rfid)]));
        }
        if let Some(email) = email
            && others().any(|u| u.email == email)
        {
            return Err(StaffServiceError::Validation(vec![email_taken(email)]));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(
        &self,
        id: Uuid,
        user_type: UserType,
    ) -> Result<Option<User>, StaffServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id && u.user_type == user_type)
            .cloned())
    }

    async fn find_by_rfid(&self, rfid: &str) -> Result<Option<User>, StaffServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.rfid == rfid)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StaffServiceError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_school_year(
        &self,
        user_type: UserType,
        school_year_id: Uuid,
    ) -> Result<Vec<UserWithSchoolYear>, StaffServiceError> {
        let school_years = self.school_years.lock().unwrap();
        let Some(school_year) = school_years.get(&school_year_id) else {
            return Ok(Vec::new());
        };

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.user_type == user_type && u.school_year_id == Some(school_year_id))
            .map(|u| UserWithSchoolYear {
                user: u.clone(),
                school_year: school_year.clone(),
            })
            .collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, StaffServiceError> {
        let mut rows = self.rows.lock().unwrap();
        Self::check_constraints(&rows, None, Some(&user.rfid), Some(&user.email))?;

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            rfid: user.rfid,
            email: user.email,
            password: user.password,
            name: user.name,
            user_type: user.user_type,
            school_year_id: user.school_year_id,
            created_at: now,
            updated_at: now,
        };
        rows.push(created.clone());

        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        user_type: UserType,
        patch: UserPatch,
    ) -> Result<u64, StaffServiceError> {
        let mut rows = self.rows.lock().unwrap();
        Self::check_constraints(
            &rows,
            Some(id),
            patch.rfid.as_deref(),
            patch.email.as_deref(),
        )?;

        let Some(user) = rows
            .iter_mut()
            .find(|u| u.id == id && u.user_type == user_type)
        else {
            return Ok(0);
        };

        if let Some(rfid) = patch.rfid {
            user.rfid = rfid;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password) = patch.password {
            user.password = password;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        user.updated_at = Utc::now();

        Ok(1)
    }

    async fn delete(&self, id: Uuid, user_type: UserType) -> Result<u64, StaffServiceError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| !(u.id == id && u.user_type == user_type));

        Ok((before - rows.len()) as u64)
    }
}

pub struct TestContext {
    pub service: StaffService,
    pub users: InMemoryUsers,
    pub school_years: InMemorySchoolYears,
}

pub fn setup() -> TestContext {
    let school_years = InMemorySchoolYears::default();
    let users = InMemoryUsers::new(&school_years);
    let hasher = Argon2PasswordHasher::new(&PasswordConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();

    let service = StaffService::new(
        Arc::new(users.clone()),
        Arc::new(school_years.clone()),
        Arc::new(hasher),
    );

    TestContext {
        service,
        users,
        school_years,
    }
}
