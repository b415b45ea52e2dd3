//! [Ecoguard Insight](https://insight.ecoguard.se) tenant portal.
//!
//! There is no public API: the client logs in like a browser does and scrapes the account pages.

mod html;
mod pricelist;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    api::{
        client,
        ecoguard::{
            html::{parse_consumption, parse_daily, parse_verification_token},
            pricelist::PriceLists,
        },
    },
    core::{
        portal::{Credentials, FetchError, Portal},
        records::Fetched,
    },
    prelude::*,
};

pub struct Api {
    base_url: Url,
    request_timeout: Duration,
}

impl Api {
    pub fn try_new(base_url: Url, request_timeout: Duration) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be a base URL");
        Ok(Self { base_url, request_timeout })
    }

    /// Log in and drop the session.
    #[instrument(skip_all, fields(rentable_object_number = %credentials.rentable_object_number))]
    pub async fn validate(&self, credentials: &Credentials) -> Result<(), FetchError> {
        self.log_in(credentials).await.map(drop)
    }

    async fn log_in(&self, credentials: &Credentials) -> Result<Session, FetchError> {
        let client = client::builder(self.request_timeout).cookie_store(true).build()?;

        debug!("requesting the logon page…");
        let logon_page = client.get(self.base_url.clone()).send().await?.error_for_status()?;
        let token = parse_verification_token(&logon_page.text().await?).ok_or_else(|| {
            FetchError::UnexpectedResponseShape("no verification token on the logon page".into())
        })?;

        debug!("logging in…");
        let form = [
            ("RentableObjectNumber", credentials.rentable_object_number.as_str()),
            ("Password", credentials.password.as_str()),
            ("DatabaseName", credentials.database_name.as_str()),
            ("RememberMe", "true"),
            ("__RequestVerificationToken", token.as_str()),
        ];
        let response = client
            .post(join(&self.base_url, &["account", "logon"]))
            .form(&form)
            .send()
            .await?
            .error_for_status()?;
        if is_logon_page(response.url()) {
            return Err(FetchError::AuthenticationFailed);
        }
        info!("logged in");

        let account_url = join(
            &self.base_url,
            &[
                "domains",
                &strip_diacritics(&credentials.database_name),
                "objects",
                &credentials.rentable_object_number,
            ],
        );
        Ok(Session { client, account_url })
    }
}

#[async_trait]
impl Portal for Api {
    #[instrument(skip_all, fields(rentable_object_number = %credentials.rentable_object_number))]
    async fn fetch(&self, credentials: &Credentials) -> Result<Fetched, FetchError> {
        let session = self.log_in(credentials).await?;
        let consumption =
            parse_consumption(&session.get_electricity_table("ViewLatestYearConsumptionTable").await?)?;
        let daily = parse_daily(&session.get_electricity_table("ViewCurrentMonthTable").await?)?;
        let price = PriceLists::from_json(&session.get(join(&session.account_url, &["pricelists"])).await?)?
            .into_current()?;
        Ok(Fetched { consumption, daily, price })
    }
}

/// Logged-in portal session.
struct Session {
    client: Client,
    account_url: Url,
}

impl Session {
    async fn get_electricity_table(&self, name: &str) -> Result<String, FetchError> {
        let mut url = join(&self.account_url, &["consumption", name]);
        url.query_pairs_mut().append_pair("UtilityCode", "ELEC");
        self.get(url).await
    }

    #[instrument(skip_all, fields(path = url.path()))]
    async fn get(&self, url: Url) -> Result<String, FetchError> {
        debug!("requesting…");
        let response = self.client.get(url).send().await?.error_for_status()?;
        if is_logon_page(response.url()) {
            warn!("the session has expired");
            return Err(FetchError::AuthenticationFailed);
        }
        Ok(response.text().await?)
    }
}

/// Append the path segments to the base URL.
///
/// The base URL is checked to be able to have a path when the API is constructed.
fn join(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut path_segments) = url.path_segments_mut() {
        path_segments.pop_if_empty().extend(segments);
    }
    url
}

fn is_logon_page(url: &Url) -> bool {
    url.path().to_ascii_lowercase().contains("/account/logon")
}

/// The portal addresses databases by their names without diacritics.
fn strip_diacritics(name: &str) -> String {
    name.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use mockito::{Matcher, Mock, Server};
    use tokio::net::TcpListener;

    use super::*;

    const LOGON_PAGE: &str = r#"
        <html><body>
            <form action="/account/logon" method="post">
                <input name="__RequestVerificationToken" type="hidden" value="token-123" />
                <input name="Password" type="password" />
            </form>
        </body></html>
    "#;

    const ACCOUNT_PATH: &str = "/domains/BrfSjoutsikt/objects/1234";

    fn credentials() -> Credentials {
        Credentials {
            rentable_object_number: "1234".into(),
            password: "secret".into(),
            database_name: "BrfSjöutsikt".into(),
        }
    }

    fn api(server: &Server) -> Result<Api> {
        Api::try_new(server.url().parse()?, Duration::from_secs(5))
    }

    /// Mock the logon page and the form submission, which redirects to `landing_path`.
    async fn mock_log_in(server: &mut Server, landing_path: &str) -> Vec<Mock> {
        vec![
            server
                .mock("GET", "/")
                .with_header("content-type", "text/html; charset=utf-8")
                .with_header("set-cookie", "__RequestVerificationToken=cookie-123; Path=/")
                .with_body(LOGON_PAGE)
                .create_async()
                .await,
            server
                .mock("POST", "/account/logon")
                .match_body(Matcher::AllOf(vec![
                    Matcher::UrlEncoded("RentableObjectNumber".into(), "1234".into()),
                    Matcher::UrlEncoded("Password".into(), "secret".into()),
                    Matcher::UrlEncoded("DatabaseName".into(), "BrfSjöutsikt".into()),
                    Matcher::UrlEncoded("RememberMe".into(), "true".into()),
                    Matcher::UrlEncoded("__RequestVerificationToken".into(), "token-123".into()),
                ]))
                .with_status(302)
                .with_header("location", landing_path)
                .create_async()
                .await,
        ]
    }

    async fn mock_landing(server: &mut Server, path: &str, body: &str) -> Mock {
        server.mock("GET", path).with_body(body).create_async().await
    }

    async fn mock_table(server: &mut Server, name: &str, body: &str) -> Mock {
        server
            .mock("GET", format!("{ACCOUNT_PATH}/consumption/{name}").as_str())
            .match_query(Matcher::UrlEncoded("UtilityCode".into(), "ELEC".into()))
            .match_header("cookie", Matcher::Regex("__RequestVerificationToken=cookie-123".into()))
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_fetch_ok() -> Result {
        let mut server = Server::new_async().await;
        let log_in_mocks = mock_log_in(&mut server, "/start").await;
        let landing_mock = mock_landing(&mut server, "/start", "<html>Välkommen</html>").await;
        let year_mock = mock_table(
            &mut server,
            "ViewLatestYearConsumptionTable",
            r"<table><tbody>
                <tr><td>december 2025</td><td>310,5</td><td>574,43</td></tr>
                <tr><td>januari 2026</td><td>1&nbsp;020,0</td><td>1 887,00</td></tr>
            </tbody></table>",
        )
        .await;
        let month_mock = mock_table(
            &mut server,
            "ViewCurrentMonthTable",
            r"<table><tbody>
                <tr><td>2026-02-01</td><td>10,5</td></tr>
                <tr><td>2026-02-02</td><td>-</td></tr>
            </tbody></table>",
        )
        .await;
        let price_mock = server
            .mock("GET", format!("{ACCOUNT_PATH}/pricelists").as_str())
            .with_header("content-type", "application/json")
            .with_body(r#"{"PriceLists":[{"Interval":"2026-01-01 - 2026-12-31","Components":[{"Rate":1.85}]}]}"#)
            .create_async()
            .await;

        let fetched = api(&server)?.fetch(&credentials()).await?;

        for mock in log_in_mocks {
            mock.assert_async().await;
        }
        landing_mock.assert_async().await;
        year_mock.assert_async().await;
        month_mock.assert_async().await;
        price_mock.assert_async().await;

        assert_eq!(fetched.consumption.len(), 2);
        assert_abs_diff_eq!(fetched.consumption[1].energy.0, 1020.0);
        assert_eq!(fetched.daily.len(), 1);
        assert_abs_diff_eq!(fetched.price.rate.0, 1.85);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_wrong_password() -> Result {
        let mut server = Server::new_async().await;
        let _log_in_mocks = mock_log_in(&mut server, "/account/logon").await;
        let _landing_mock = mock_landing(&mut server, "/account/logon", LOGON_PAGE).await;
        let year_mock = server
            .mock("GET", Matcher::Regex("^/domains/".into()))
            .expect(0)
            .create_async()
            .await;

        let error = api(&server)?.fetch(&credentials()).await.unwrap_err();
        assert_eq!(error, FetchError::AuthenticationFailed);
        year_mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_validate_ok() -> Result {
        let mut server = Server::new_async().await;
        let _log_in_mocks = mock_log_in(&mut server, "/start").await;
        let _landing_mock = mock_landing(&mut server, "/start", "<html>Välkommen</html>").await;
        api(&server)?.validate(&credentials()).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_verification_token() -> Result {
        let mut server = Server::new_async().await;
        let _mock = mock_landing(&mut server, "/", "<html><form></form></html>").await;
        let error = api(&server)?.validate(&credentials()).await.unwrap_err();
        assert!(matches!(error, FetchError::UnexpectedResponseShape(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(503).create_async().await;
        let error = api(&server)?.validate(&credentials()).await.unwrap_err();
        assert!(matches!(error, FetchError::NetworkUnavailable(_)));
        assert!(error.is_retryable());
        Ok(())
    }

    #[tokio::test]
    async fn test_connection_refused() -> Result {
        let api = Api::try_new("http://127.0.0.1:1/".parse()?, Duration::from_secs(5))?;
        let error = api.fetch(&credentials()).await.unwrap_err();
        assert!(matches!(error, FetchError::NetworkUnavailable(_)), "{error:?}");
        assert!(error.is_retryable());
        Ok(())
    }

    #[tokio::test]
    async fn test_request_timeout() -> Result {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}/", listener.local_addr()?).parse()?;
        let silent_server = tokio::spawn(async move {
            let mut connections = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                connections.push(stream);
            }
        });

        let api = Api::try_new(base_url, Duration::from_millis(100))?;
        let error = api.fetch(&credentials()).await.unwrap_err();
        silent_server.abort();
        assert_eq!(error, FetchError::Timeout);
        Ok(())
    }

    #[tokio::test]
    async fn test_forbidden() -> Result {
        let mut server = Server::new_async().await;
        let _mock = server.mock("GET", "/").with_status(403).create_async().await;
        let error = api(&server)?.validate(&credentials()).await.unwrap_err();
        assert_eq!(error, FetchError::AuthenticationFailed);
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_session() -> Result {
        let mut server = Server::new_async().await;
        let _log_in_mocks = mock_log_in(&mut server, "/start").await;
        let _landing_mock = mock_landing(&mut server, "/start", "<html>Välkommen</html>").await;
        let _year_mock = server
            .mock("GET", format!("{ACCOUNT_PATH}/consumption/ViewLatestYearConsumptionTable").as_str())
            .match_query(Matcher::Any)
            .with_status(302)
            .with_header("location", "/account/logon?ReturnUrl=%2Fdomains")
            .create_async()
            .await;
        let _logon_mock = server
            .mock("GET", "/account/logon")
            .match_query(Matcher::Any)
            .with_body(LOGON_PAGE)
            .create_async()
            .await;

        let error = api(&server)?.fetch(&credentials()).await.unwrap_err();
        assert_eq!(error, FetchError::AuthenticationFailed);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_price_list() -> Result {
        let mut server = Server::new_async().await;
        let _log_in_mocks = mock_log_in(&mut server, "/start").await;
        let _landing_mock = mock_landing(&mut server, "/start", "<html>Välkommen</html>").await;
        let _year_mock =
            mock_table(&mut server, "ViewLatestYearConsumptionTable", "<table><tbody></tbody></table>")
                .await;
        let _month_mock =
            mock_table(&mut server, "ViewCurrentMonthTable", "<table><tbody></tbody></table>").await;
        let _price_mock = server
            .mock("GET", format!("{ACCOUNT_PATH}/pricelists").as_str())
            .with_body(r#"{"PriceLists":[]}"#)
            .create_async()
            .await;

        let error = api(&server)?.fetch(&credentials()).await.unwrap_err();
        assert!(matches!(error, FetchError::UnexpectedResponseShape(_)));
        Ok(())
    }

    #[test]
    fn test_join() -> Result {
        let base_url: Url = "https://insight.ecoguard.se/".parse()?;
        assert_eq!(
            join(&base_url, &["account", "logon"]).as_str(),
            "https://insight.ecoguard.se/account/logon"
        );
        Ok(())
    }

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("HSB Brf Åkerö"), "HSB Brf Akero");
        assert_eq!(strip_diacritics("Brf Žižkov"), "Brf Zizkov");
        assert_eq!(strip_diacritics("ýčśō"), "ycso");
    }
}
