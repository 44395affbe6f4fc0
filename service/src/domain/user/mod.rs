//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher as _, PasswordVerifier as _,
};
#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use self::session::Session;
pub use crate::domain::{
    contact::{Email, Phone},
    Rut,
};

/// Employee or manager of the company using the platform.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`]
    pub id: Id,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Login`] of this [`User`].
    pub login: Login,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`Email`] of this [`User`].
    pub email: Option<Email>,

    /// [`Phone`] of this [`User`].
    pub phone: Option<Phone>,

    /// [`Role`] of this [`User`].
    pub role: Role,

    /// [`Rut`] of this [`User`].
    pub rut: Option<Rut>,

    /// Indicator whether this [`User`] is allowed to sign in.
    pub is_active: bool,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`User`] was deleted.
    pub deleted_at: Option<DeletionDateTime>,
}

impl User {
    /// Indicates whether this [`User`] may open and use [`Session`]s.
    #[must_use]
    pub const fn can_sign_in(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Full name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 200
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Login of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Login(String);

impl Login {
    /// Creates a new [`Login`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `login` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    /// Creates a new [`Login`] if the given `login` is valid.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Option<Self> {
        let login = login.into();
        Self::check(&login).then_some(Self(login))
    }

    /// Checks whether the given `login` is a valid [`Login`].
    fn check(login: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Login`] invariants:
        /// - Must be between 3 and 150 characters long;
        /// - Must consist of letters, digits and `.`, `_`, `-`, `@`;
        /// - Must start with a letter or a digit.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N}._@-]{2,149}$")
                .expect("valid regex")
        });

        REGEX.is_match(login.as_ref())
    }
}

impl FromStr for Login {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Login`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() >= 8 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Salted [Argon2] hash of a [`Password`] in the [PHC string format].
///
/// [Argon2]: https://en.wikipedia.org/wiki/Argon2
/// [PHC string format]: https://github.com/P-H-C/phc-string-format
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the provided [`Password`] with a random salt.
    ///
    /// # Errors
    ///
    /// If [`Argon2`] fails to hash the [`Password`].
    pub fn new(
        password: &Password,
    ) -> Result<Self, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.0.as_bytes(), &salt)
            .map(|h| Self(h.to_string()))
    }

    /// Checks whether this [`PasswordHash`] was produced out of the provided
    /// [`Password`].
    #[must_use]
    pub fn verify(&self, password: &Password) -> bool {
        argon2::PasswordHash::new(&self.0).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &hash)
                .is_ok()
        })
    }
}

define_kind! {
    #[doc = "Role of a [`User`] in the company hierarchy."]
    enum Role {
        #[doc = "Regular employee doing the assigned jobs."]
        Employee = 1,

        #[doc = "Supervisor of a team of employees."]
        Supervisor = 2,

        #[doc = "Manager handling quotes, clients and materials."]
        Manager = 3,

        #[doc = "Director of the company."]
        Director = 4,

        #[doc = "Administrator of the whole platform."]
        Admin = 5,
    }
}

impl Role {
    /// Indicates whether this [`Role`] is the `other` one or higher in the
    /// hierarchy.
    #[must_use]
    pub const fn is_at_least(self, other: Self) -> bool {
        self.u8() >= other.u8()
    }

    /// Indicates whether a [`User`] with this [`Role`] may manage a [`User`]
    /// with the `other` one.
    ///
    /// Only strictly higher [`Role`]s may manage lower ones.
    #[must_use]
    pub const fn can_manage(self, other: Self) -> bool {
        self.u8() > other.u8()
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

/// [`DateTime`] when a [`User`] was deleted.
pub type DeletionDateTime = DateTimeOf<(User, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::{Login, Password, PasswordHash, Role};

    #[test]
    fn orders_roles_by_hierarchy() {
        assert!(Role::Admin.is_at_least(Role::Manager));
        assert!(Role::Manager.is_at_least(Role::Manager));
        assert!(!Role::Supervisor.is_at_least(Role::Manager));

        assert!(Role::Director.can_manage(Role::Manager));
        assert!(!Role::Manager.can_manage(Role::Manager));
        assert!(!Role::Employee.can_manage(Role::Admin));
    }

    #[test]
    fn validates_login() {
        assert!(Login::new("jalvarado").is_some());
        assert!(Login::new("j.alvarado_2@osorno").is_some());
        assert!(Login::new("ab").is_none());
        assert!(Login::new(".hidden").is_none());
        assert!(Login::new("with space").is_none());
    }

    #[test]
    fn hashes_and_verifies_passwords() {
        let password = Password::new("bombas-de-agua").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert_ne!(hash.to_string(), "bombas-de-agua");
        assert!(hash.verify(&password));
        assert!(!hash.verify(&Password::new("bombas-de-aceite").unwrap()));

        let other = PasswordHash::new(&password).unwrap();
        assert_ne!(hash, other, "salt must differ between hashes");
    }

    #[test]
    fn signs_in_only_active_undeleted_users() {
        let mut user = crate::fixture::user(Role::Employee);
        assert!(user.can_sign_in());

        user.is_active = false;
        assert!(!user.can_sign_in());

        user.is_active = true;
        user.deleted_at = Some(common::DateTime::now().coerce());
        assert!(!user.can_sign_in());
    }

    #[test]
    fn rejects_short_passwords() {
        assert!(Password::new("1234567").is_none());
        assert!(Password::new("12345678").is_some());
    }
}
