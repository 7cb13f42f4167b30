use tokio_postgres::{Error as PgError, Row};
use deadpool_postgres::GenericClient;

pub type UserId = i64;

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// encrypted password hash, see [`crate::sec::authn::password`]
    pub password: String,
    /// base32 encoded totp secret
    pub otp_secret: Option<String>,
    pub otp_enrolled: bool,
    pub consent: bool,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub otp_secret: Option<&'a str>,
    pub consent: bool,
}

const USER_COLUMNS: &str = "\
    users.id, \
    users.username, \
    users.email, \
    users.password, \
    users.otp_secret, \
    users.otp_enrolled, \
    users.consent";

impl User {
    fn from_row(row: &Row) -> Self {
        User {
            id: row.get(0),
            username: row.get(1),
            email: row.get(2),
            password: row.get(3),
            otp_secret: row.get(4),
            otp_enrolled: row.get(5),
            consent: row.get(6),
        }
    }

    pub async fn query_with_id(
        conn: &impl GenericClient,
        id: &UserId
    ) -> Result<Option<Self>, PgError> {
        let query = format!("select {USER_COLUMNS} from users where users.id = $1");

        Ok(conn.query_opt(&query, &[id])
            .await?
            .map(|row| Self::from_row(&row)))
    }

    pub async fn query_with_username(
        conn: &impl GenericClient,
        username: &str
    ) -> Result<Option<Self>, PgError> {
        let query = format!("select {USER_COLUMNS} from users where users.username = $1");

        Ok(conn.query_opt(&query, &[&username])
            .await?
            .map(|row| Self::from_row(&row)))
    }

    pub async fn username_exists(conn: &impl GenericClient, username: &str) -> Result<bool, PgError> {
        let check = conn.execute(
            "select id from users where username = $1",
            &[&username]
        ).await?;

        Ok(check == 1)
    }

    pub async fn email_exists(conn: &impl GenericClient, email: &str) -> Result<bool, PgError> {
        let check = conn.execute(
            "select id from users where email = $1",
            &[&email]
        ).await?;

        Ok(check == 1)
    }

    pub async fn create(conn: &impl GenericClient, new: NewUser<'_>) -> Result<UserId, PgError> {
        let row = conn.query_one(
            "\
            insert into users (username, email, password, otp_secret, consent) values \
            ($1, $2, $3, $4, $5) \
            returning id",
            &[&new.username, &new.email, &new.password, &new.otp_secret, &new.consent]
        ).await?;

        Ok(row.get(0))
    }

    pub async fn set_otp_secret(&mut self, conn: &impl GenericClient, secret: String) -> Result<(), PgError> {
        let _ = conn.execute(
            "update users set otp_secret = $2 where id = $1",
            &[&self.id, &secret]
        ).await?;

        self.otp_secret = Some(secret);

        Ok(())
    }

    pub async fn set_enrolled(&mut self, conn: &impl GenericClient) -> Result<(), PgError> {
        if self.otp_enrolled {
            return Ok(());
        }

        let _ = conn.execute(
            "update users set otp_enrolled = true where id = $1",
            &[&self.id]
        ).await?;

        self.otp_enrolled = true;

        Ok(())
    }
}
