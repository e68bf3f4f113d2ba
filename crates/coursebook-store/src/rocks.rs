//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use coursebook_core::{
    BookingId, Coach, CoachId, Course, CourseBooking, CourseId, CreditLedger, CreditPackage,
    CreditPackageId, CreditPurchase, PurchaseId, Skill, SkillId, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    /// Serializes every check-then-write operation.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Take the store-wide write lock. The guarded value is `()`, so a
    /// poisoned lock carries no broken state and is recovered.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read 16 id bytes stored as an index value.
    fn id_bytes(data: &[u8]) -> Result<[u8; 16]> {
        data.try_into()
            .map_err(|_| StoreError::Serialization(format!("bad id length: {}", data.len())))
    }

    fn get_value<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn get_raw(&self, cf_name: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        Ok(self.db.get_cf(&cf, key)?)
    }

    /// Decode every value in a column family.
    fn scan_values<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            values.push(Self::deserialize(&value)?);
        }
        Ok(values)
    }

    /// Collect the ULID suffixes of all index keys under `prefix`, oldest first.
    fn scan_index(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<[u8; 16]>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut ids = Vec::new();
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            if let Some(suffix) = keys::index_suffix(&key) {
                ids.push(suffix);
            }
        }
        Ok(ids)
    }

    fn bookings_under(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<CourseBooking>> {
        let mut bookings = Vec::new();
        for suffix in self.scan_index(cf_name, prefix)? {
            let id = BookingId::from_bytes(suffix);
            if let Some(booking) =
                self.get_value::<CourseBooking>(cf::COURSE_BOOKINGS, &id.to_bytes())?
            {
                bookings.push(booking);
            }
        }
        Ok(bookings)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Users
    // =========================================================================

    fn create_user(&self, user: &User) -> Result<()> {
        let _guard = self.lock();

        let email_key = keys::email_key(&user.email);
        if self.get_raw(cf::USERS_BY_EMAIL, &email_key)?.is_some() {
            return Err(StoreError::Conflict("email already registered".into()));
        }

        let cf_users = self.cf(cf::USERS)?;
        let cf_by_email = self.cf(cf::USERS_BY_EMAIL)?;
        let value = Self::serialize(user)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, user.id.as_bytes(), &value);
        batch.put_cf(&cf_by_email, &email_key, user.id.as_bytes());
        self.db.write(batch)?;

        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get_value(cf::USERS, user_id.as_bytes())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(raw) = self.get_raw(cf::USERS_BY_EMAIL, &keys::email_key(email))? else {
            return Ok(None);
        };
        let user_id = UserId::from_bytes(Self::id_bytes(&raw)?);
        self.get_user(&user_id)
    }

    fn rename_user(&self, user_id: &UserId, name: &str) -> Result<User> {
        let _guard = self.lock();

        let mut user = self
            .get_user(user_id)?
            .ok_or_else(|| StoreError::not_found("user", user_id))?;
        user.rename(name.to_string());

        let cf_users = self.cf(cf::USERS)?;
        self.db
            .put_cf(&cf_users, user_id.as_bytes(), Self::serialize(&user)?)?;

        Ok(user)
    }

    // =========================================================================
    // Coaches
    // =========================================================================

    fn promote_to_coach(&self, coach: &Coach) -> Result<User> {
        let _guard = self.lock();

        let mut user = self
            .get_user(&coach.user_id)?
            .ok_or_else(|| StoreError::not_found("user", coach.user_id))?;

        if user.is_coach() {
            return Err(StoreError::Conflict("user is already a coach".into()));
        }
        user.promote();

        let cf_users = self.cf(cf::USERS)?;
        let cf_coaches = self.cf(cf::COACHES)?;
        let cf_by_user = self.cf(cf::COACHES_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, user.id.as_bytes(), Self::serialize(&user)?);
        batch.put_cf(&cf_coaches, coach.id.as_bytes(), Self::serialize(coach)?);
        batch.put_cf(&cf_by_user, coach.user_id.as_bytes(), coach.id.as_bytes());
        self.db.write(batch)?;

        tracing::debug!(user_id = %user.id, coach_id = %coach.id, "User promoted to coach");

        Ok(user)
    }

    fn get_coach(&self, coach_id: &CoachId) -> Result<Option<Coach>> {
        self.get_value(cf::COACHES, coach_id.as_bytes())
    }

    fn get_coach_by_user(&self, user_id: &UserId) -> Result<Option<Coach>> {
        let Some(raw) = self.get_raw(cf::COACHES_BY_USER, user_id.as_bytes())? else {
            return Ok(None);
        };
        let coach_id = CoachId::from_bytes(Self::id_bytes(&raw)?);
        self.get_coach(&coach_id)
    }

    fn list_coaches(&self, limit: usize, offset: usize) -> Result<Vec<Coach>> {
        let mut coaches: Vec<Coach> = self.scan_values(cf::COACHES)?;
        coaches.sort_by_key(|c| c.created_at);
        Ok(coaches.into_iter().skip(offset).take(limit).collect())
    }

    // =========================================================================
    // Skills
    // =========================================================================

    fn create_skill(&self, skill: &Skill) -> Result<()> {
        let _guard = self.lock();

        let name_key = keys::name_key(&skill.name);
        if self.get_raw(cf::SKILLS_BY_NAME, &name_key)?.is_some() {
            return Err(StoreError::Conflict(format!("skill already exists: {}", skill.name)));
        }

        let cf_skills = self.cf(cf::SKILLS)?;
        let cf_by_name = self.cf(cf::SKILLS_BY_NAME)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_skills, skill.id.as_bytes(), Self::serialize(skill)?);
        batch.put_cf(&cf_by_name, &name_key, skill.id.as_bytes());
        self.db.write(batch)?;

        Ok(())
    }

    fn get_skill(&self, skill_id: &SkillId) -> Result<Option<Skill>> {
        self.get_value(cf::SKILLS, skill_id.as_bytes())
    }

    fn list_skills(&self) -> Result<Vec<Skill>> {
        let mut skills: Vec<Skill> = self.scan_values(cf::SKILLS)?;
        skills.sort_by_key(|s| s.created_at);
        Ok(skills)
    }

    fn delete_skill(&self, skill_id: &SkillId) -> Result<()> {
        let _guard = self.lock();

        let skill = self
            .get_skill(skill_id)?
            .ok_or_else(|| StoreError::not_found("skill", skill_id))?;

        let cf_skills = self.cf(cf::SKILLS)?;
        let cf_by_name = self.cf(cf::SKILLS_BY_NAME)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_skills, skill_id.as_bytes());
        batch.delete_cf(&cf_by_name, keys::name_key(&skill.name));
        self.db.write(batch)?;

        Ok(())
    }

    // =========================================================================
    // Courses
    // =========================================================================

    fn create_course(&self, course: &Course) -> Result<()> {
        let cf_courses = self.cf(cf::COURSES)?;
        self.db
            .put_cf(&cf_courses, course.id.as_bytes(), Self::serialize(course)?)?;
        Ok(())
    }

    fn get_course(&self, course_id: &CourseId) -> Result<Option<Course>> {
        self.get_value(cf::COURSES, course_id.as_bytes())
    }

    fn update_course(&self, course: &Course) -> Result<()> {
        let _guard = self.lock();

        if self.get_raw(cf::COURSES, course.id.as_bytes())?.is_none() {
            return Err(StoreError::not_found("course", course.id));
        }

        let cf_courses = self.cf(cf::COURSES)?;
        self.db
            .put_cf(&cf_courses, course.id.as_bytes(), Self::serialize(course)?)?;
        Ok(())
    }

    fn list_courses(&self) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self.scan_values(cf::COURSES)?;
        courses.sort_by_key(|c| (c.start_at, c.created_at));
        Ok(courses)
    }

    // =========================================================================
    // Credit packages and purchases
    // =========================================================================

    fn create_credit_package(&self, package: &CreditPackage) -> Result<()> {
        let _guard = self.lock();

        let name_key = keys::name_key(&package.name);
        if self.get_raw(cf::CREDIT_PACKAGES_BY_NAME, &name_key)?.is_some() {
            return Err(StoreError::Conflict(format!(
                "credit package already exists: {}",
                package.name
            )));
        }

        let cf_packages = self.cf(cf::CREDIT_PACKAGES)?;
        let cf_by_name = self.cf(cf::CREDIT_PACKAGES_BY_NAME)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_packages, package.id.as_bytes(), Self::serialize(package)?);
        batch.put_cf(&cf_by_name, &name_key, package.id.as_bytes());
        self.db.write(batch)?;

        Ok(())
    }

    fn get_credit_package(&self, package_id: &CreditPackageId) -> Result<Option<CreditPackage>> {
        self.get_value(cf::CREDIT_PACKAGES, package_id.as_bytes())
    }

    fn list_credit_packages(&self) -> Result<Vec<CreditPackage>> {
        let mut packages: Vec<CreditPackage> = self.scan_values(cf::CREDIT_PACKAGES)?;
        packages.sort_by_key(|p| p.created_at);
        Ok(packages)
    }

    fn delete_credit_package(&self, package_id: &CreditPackageId) -> Result<()> {
        let _guard = self.lock();

        let package = self
            .get_credit_package(package_id)?
            .ok_or_else(|| StoreError::not_found("credit package", package_id))?;

        let cf_packages = self.cf(cf::CREDIT_PACKAGES)?;
        let cf_by_name = self.cf(cf::CREDIT_PACKAGES_BY_NAME)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_packages, package_id.as_bytes());
        batch.delete_cf(&cf_by_name, keys::name_key(&package.name));
        self.db.write(batch)?;

        Ok(())
    }

    fn purchase_credit_package(
        &self,
        user_id: &UserId,
        package_id: &CreditPackageId,
    ) -> Result<CreditPurchase> {
        let _guard = self.lock();

        let package = self
            .get_credit_package(package_id)?
            .ok_or_else(|| StoreError::not_found("credit package", package_id))?;

        let purchase = CreditPurchase::from_package(*user_id, &package);

        let cf_purchases = self.cf(cf::CREDIT_PURCHASES)?;
        let cf_by_user = self.cf(cf::CREDIT_PURCHASES_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_purchases, purchase.id.to_bytes(), Self::serialize(&purchase)?);
        batch.put_cf(&cf_by_user, keys::user_purchase_key(user_id, &purchase.id), []);
        self.db.write(batch)?;

        Ok(purchase)
    }

    fn list_purchases_by_user(&self, user_id: &UserId) -> Result<Vec<CreditPurchase>> {
        let mut purchases = Vec::new();
        for suffix in self.scan_index(cf::CREDIT_PURCHASES_BY_USER, user_id.as_bytes())? {
            let id = PurchaseId::from_bytes(suffix);
            if let Some(purchase) = self.get_value(cf::CREDIT_PURCHASES, &id.to_bytes())? {
                purchases.push(purchase);
            }
        }
        Ok(purchases)
    }

    fn total_purchased_credits(&self, user_id: &UserId) -> Result<u64> {
        Ok(self
            .list_purchases_by_user(user_id)?
            .iter()
            .map(|p| u64::from(p.purchased_credits))
            .sum())
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    fn get_active_booking(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<CourseBooking>> {
        Ok(self
            .bookings_under(cf::BOOKINGS_BY_USER, user_id.as_bytes())?
            .into_iter()
            .find(|b| b.course_id == *course_id && b.is_active()))
    }

    fn count_active_bookings_by_user(&self, user_id: &UserId) -> Result<u64> {
        let bookings = self.bookings_under(cf::BOOKINGS_BY_USER, user_id.as_bytes())?;
        Ok(bookings.iter().filter(|b| b.is_active()).count() as u64)
    }

    fn count_active_bookings_by_course(&self, course_id: &CourseId) -> Result<u64> {
        let bookings = self.bookings_under(cf::BOOKINGS_BY_COURSE, course_id.as_bytes())?;
        Ok(bookings.iter().filter(|b| b.is_active()).count() as u64)
    }

    fn list_bookings_by_user(&self, user_id: &UserId) -> Result<Vec<CourseBooking>> {
        self.bookings_under(cf::BOOKINGS_BY_USER, user_id.as_bytes())
    }

    fn book_course(&self, booking: &CourseBooking) -> Result<CreditLedger> {
        let _guard = self.lock();

        let course = self
            .get_course(&booking.course_id)?
            .ok_or_else(|| StoreError::not_found("course", booking.course_id))?;

        if self
            .get_active_booking(&booking.user_id, &booking.course_id)?
            .is_some()
        {
            return Err(StoreError::AlreadyBooked);
        }

        let ledger = CreditLedger {
            total_credits: self.total_purchased_credits(&booking.user_id)?,
            used_credits: self.count_active_bookings_by_user(&booking.user_id)?,
            course_bookings: self.count_active_bookings_by_course(&booking.course_id)?,
            max_participants: course.max_participants,
        };
        ledger.evaluate()?;

        let cf_bookings = self.cf(cf::COURSE_BOOKINGS)?;
        let cf_by_user = self.cf(cf::BOOKINGS_BY_USER)?;
        let cf_by_course = self.cf(cf::BOOKINGS_BY_COURSE)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_bookings, booking.id.to_bytes(), Self::serialize(booking)?);
        batch.put_cf(
            &cf_by_user,
            keys::user_booking_key(&booking.user_id, &booking.id),
            [],
        );
        batch.put_cf(
            &cf_by_course,
            keys::course_booking_key(&booking.course_id, &booking.id),
            [],
        );
        self.db.write(batch)?;

        tracing::debug!(
            user_id = %booking.user_id,
            course_id = %booking.course_id,
            remaining_credits = ledger.remaining_credits().saturating_sub(1),
            "Booking stored"
        );

        Ok(ledger)
    }

    fn cancel_booking(&self, user_id: &UserId, course_id: &CourseId) -> Result<CourseBooking> {
        let _guard = self.lock();

        let mut booking = self
            .get_active_booking(user_id, course_id)?
            .ok_or_else(|| StoreError::not_found("booking", course_id))?;
        booking.cancel(chrono::Utc::now());

        let cf_bookings = self.cf(cf::COURSE_BOOKINGS)?;
        self.db
            .put_cf(&cf_bookings, booking.id.to_bytes(), Self::serialize(&booking)?)?;

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use coursebook_core::{BookingRejection, CourseDraft};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn create_user(store: &RocksStore, email: &str) -> User {
        let user = User::new("Tester".into(), email.into(), "hash".into());
        store.create_user(&user).unwrap();
        user
    }

    fn create_course(store: &RocksStore, owner: UserId, max_participants: u32) -> Course {
        let start_at = Utc::now() + Duration::days(1);
        let course = Course::new(
            owner,
            CourseDraft {
                skill_id: SkillId::generate(),
                name: "Yoga".into(),
                description: "Morning flow".into(),
                start_at,
                end_at: start_at + Duration::hours(1),
                max_participants,
                meeting_url: "https://meet.example.com/yoga".into(),
            },
        );
        store.create_course(&course).unwrap();
        course
    }

    fn buy_credits(store: &RocksStore, user_id: &UserId, name: &str, credits: u32) {
        let package = CreditPackage::new(name.into(), credits, 1000);
        store.create_credit_package(&package).unwrap();
        store.purchase_credit_package(user_id, &package.id).unwrap();
    }

    #[test]
    fn user_email_is_unique() {
        let (store, _dir) = create_test_store();
        create_user(&store, "alice@example.com");

        let dup = User::new("Other".into(), "ALICE@example.com".into(), "hash".into());
        let result = store.create_user(&dup);
        assert!(matches!(result, Err(StoreError::Conflict(_))));

        let found = store.find_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(found.name, "Tester");
        assert!(store.get_user(&dup.id).unwrap().is_none());
    }

    #[test]
    fn rename_user_persists() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "bob@example.com");

        let renamed = store.rename_user(&user.id, "Bobby").unwrap();
        assert_eq!(renamed.name, "Bobby");
        assert_eq!(store.get_user(&user.id).unwrap().unwrap().name, "Bobby");

        let missing = store.rename_user(&UserId::generate(), "Ghost");
        assert!(matches!(missing, Err(StoreError::NotFound { entity: "user", .. })));
    }

    #[test]
    fn promotion_is_one_shot() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "coach@example.com");

        let coach = Coach::new(user.id, 5, "Yoga teacher".into(), None);
        let promoted = store.promote_to_coach(&coach).unwrap();
        assert!(promoted.is_coach());
        assert_eq!(store.get_coach_by_user(&user.id).unwrap().unwrap().id, coach.id);

        let again = Coach::new(user.id, 9, "Second try".into(), None);
        let result = store.promote_to_coach(&again);
        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(store.get_coach(&again.id).unwrap().is_none());
        assert_eq!(store.list_coaches(10, 0).unwrap().len(), 1);
    }

    #[test]
    fn promotion_of_unknown_user_fails() {
        let (store, _dir) = create_test_store();
        let coach = Coach::new(UserId::generate(), 1, "Nobody".into(), None);
        let result = store.promote_to_coach(&coach);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn list_coaches_paginates_in_creation_order() {
        let (store, _dir) = create_test_store();
        for i in 0..3 {
            let user = create_user(&store, &format!("c{i}@example.com"));
            store
                .promote_to_coach(&Coach::new(user.id, i, format!("coach {i}"), None))
                .unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let page1 = store.list_coaches(2, 0).unwrap();
        let page2 = store.list_coaches(2, 2).unwrap();
        assert_eq!(page1.len(), 2);
        assert_eq!(page2.len(), 1);
        assert_eq!(page1[0].description, "coach 0");
        assert_eq!(page2[0].description, "coach 2");
    }

    #[test]
    fn skill_name_is_unique_until_deleted() {
        let (store, _dir) = create_test_store();
        let skill = Skill::new("Yoga".into());
        store.create_skill(&skill).unwrap();

        let dup = store.create_skill(&Skill::new("Yoga".into()));
        assert!(matches!(dup, Err(StoreError::Conflict(_))));

        store.delete_skill(&skill.id).unwrap();
        assert!(store.list_skills().unwrap().is_empty());
        store.create_skill(&Skill::new("Yoga".into())).unwrap();

        let missing = store.delete_skill(&skill.id);
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn purchase_survives_package_deletion() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "buyer@example.com");
        let package = CreditPackage::new("Pack A".into(), 10, 1000);
        store.create_credit_package(&package).unwrap();

        let purchase = store.purchase_credit_package(&user.id, &package.id).unwrap();
        assert_eq!(purchase.purchased_credits, 10);
        assert_eq!(purchase.price_paid, 1000);

        store.delete_credit_package(&package.id).unwrap();

        let purchases = store.list_purchases_by_user(&user.id).unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].purchased_credits, 10);
        assert_eq!(purchases[0].price_paid, 1000);
        assert_eq!(store.total_purchased_credits(&user.id).unwrap(), 10);

        let gone = store.purchase_credit_package(&user.id, &package.id);
        assert!(matches!(gone, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn total_credits_sums_purchases() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "sum@example.com");
        assert_eq!(store.total_purchased_credits(&user.id).unwrap(), 0);

        buy_credits(&store, &user.id, "Small", 3);
        buy_credits(&store, &user.id, "Large", 7);
        assert_eq!(store.total_purchased_credits(&user.id).unwrap(), 10);
    }

    #[test]
    fn booking_twice_is_rejected() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "twice@example.com");
        let course = create_course(&store, UserId::generate(), 5);
        buy_credits(&store, &user.id, "Pack", 5);

        store.book_course(&CourseBooking::new(user.id, course.id)).unwrap();
        let result = store.book_course(&CourseBooking::new(user.id, course.id));
        assert!(matches!(result, Err(StoreError::AlreadyBooked)));
        assert_eq!(store.count_active_bookings_by_user(&user.id).unwrap(), 1);
    }

    #[test]
    fn booking_without_credits_is_rejected() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "broke@example.com");
        let course = create_course(&store, UserId::generate(), 5);

        let result = store.book_course(&CourseBooking::new(user.id, course.id));
        assert!(matches!(
            result,
            Err(StoreError::Rejected(BookingRejection::NoRemainingCredits))
        ));
        assert!(store.list_bookings_by_user(&user.id).unwrap().is_empty());
    }

    #[test]
    fn full_course_is_rejected() {
        let (store, _dir) = create_test_store();
        let course = create_course(&store, UserId::generate(), 1);

        let first = create_user(&store, "first@example.com");
        buy_credits(&store, &first.id, "P1", 1);
        store.book_course(&CourseBooking::new(first.id, course.id)).unwrap();

        let second = create_user(&store, "second@example.com");
        buy_credits(&store, &second.id, "P2", 1);
        let result = store.book_course(&CourseBooking::new(second.id, course.id));
        assert!(matches!(result, Err(StoreError::Rejected(BookingRejection::CourseFull))));
        assert_eq!(store.count_active_bookings_by_course(&course.id).unwrap(), 1);
    }

    #[test]
    fn booking_unknown_course_fails() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "lost@example.com");
        let result = store.book_course(&CourseBooking::new(user.id, CourseId::generate()));
        assert!(matches!(result, Err(StoreError::NotFound { entity: "course", .. })));
    }

    #[test]
    fn cancel_frees_seat_and_credit_but_keeps_history() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "cancel@example.com");
        let course = create_course(&store, UserId::generate(), 1);
        buy_credits(&store, &user.id, "One", 1);

        store.book_course(&CourseBooking::new(user.id, course.id)).unwrap();
        let cancelled = store.cancel_booking(&user.id, &course.id).unwrap();
        assert!(cancelled.cancelled_at.is_some());

        assert_eq!(store.count_active_bookings_by_course(&course.id).unwrap(), 0);
        assert_eq!(store.count_active_bookings_by_user(&user.id).unwrap(), 0);
        assert!(store.get_active_booking(&user.id, &course.id).unwrap().is_none());

        let again = store.cancel_booking(&user.id, &course.id);
        assert!(matches!(again, Err(StoreError::NotFound { .. })));

        // Rebooking works and the cancelled row is still listed.
        store.book_course(&CourseBooking::new(user.id, course.id)).unwrap();
        let history = store.list_bookings_by_user(&user.id).unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history[0].is_active());
        assert!(history[1].is_active());
    }

    #[test]
    fn update_course_requires_existing_row() {
        let (store, _dir) = create_test_store();
        let mut course = create_course(&store, UserId::generate(), 3);
        course.max_participants = 8;
        store.update_course(&course).unwrap();
        assert_eq!(
            store.get_course(&course.id).unwrap().unwrap().max_participants,
            8
        );

        let unsaved = Course::new(UserId::generate(), CourseDraft {
            skill_id: course.skill_id,
            name: course.name.clone(),
            description: course.description.clone(),
            start_at: course.start_at,
            end_at: course.end_at,
            max_participants: 1,
            meeting_url: course.meeting_url.clone(),
        });
        let result = store.update_course(&unsaved);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn concurrent_bookings_respect_capacity() {
        let (store, _dir) = create_test_store();
        let store = Arc::new(store);
        let course = create_course(&store, UserId::generate(), 3);

        let users: Vec<User> = (0..8)
            .map(|i| {
                let user = create_user(&store, &format!("race{i}@example.com"));
                buy_credits(&store, &user.id, &format!("Race{i}"), 1);
                user
            })
            .collect();

        let handles: Vec<_> = users
            .into_iter()
            .map(|user| {
                let store = Arc::clone(&store);
                let course_id = course.id;
                std::thread::spawn(move || store.book_course(&CourseBooking::new(user.id, course_id)))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 3);
        assert_eq!(store.count_active_bookings_by_course(&course.id).unwrap(), 3);
    }

    #[test]
    fn back_to_back_rows_list_in_creation_order() {
        let (store, _dir) = create_test_store();
        let user = create_user(&store, "fast@example.com");
        let package = CreditPackage::new("Bulk".into(), 1, 100);
        store.create_credit_package(&package).unwrap();

        let purchased: Vec<_> = (0..50)
            .map(|_| store.purchase_credit_package(&user.id, &package.id).unwrap().id)
            .collect();
        let listed: Vec<_> = store
            .list_purchases_by_user(&user.id)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, purchased);

        let course = create_course(&store, UserId::generate(), 5);
        let mut booked = Vec::new();
        for _ in 0..10 {
            let booking = CourseBooking::new(user.id, course.id);
            store.book_course(&booking).unwrap();
            store.cancel_booking(&user.id, &course.id).unwrap();
            booked.push(booking.id);
        }
        let listed: Vec<_> = store
            .list_bookings_by_user(&user.id)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(listed, booked);
    }
}
