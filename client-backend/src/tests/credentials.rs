mod tests {
    use std::time::Duration;

    use lib::identifiers::{Aci, Pni, Uuid};

    use crate::{
        manager::error::{DecodeError, ErrorKind, GroupError, Stage},
        tests::utils::{team_chat_master_key, test_session, DAY_ZERO},
    };

    const DAY: Duration = Duration::from_secs(86_400);

    #[tokio::test]
    pub async fn one_bundle_serves_the_whole_week() {
        let session = test_session().await;
        let master_key = team_chat_master_key();

        session
            .manager
            .get_authorization_for_today(&master_key)
            .await
            .expect("authorized on day zero");
        assert_eq!(
            session.transport.last_credential_path().as_deref(),
            Some(
                format!(
                    "/v1/certificate/auth/group?redemptionStartSeconds={DAY_ZERO}&redemptionEndSeconds={}",
                    DAY_ZERO + 7 * 86_400
                )
                .as_str()
            )
        );

        for _ in 1..7 {
            session.clock.advance(DAY);
            session
                .manager
                .get_authorization_for_today(&master_key)
                .await
                .expect("authorized from the cached bundle");
        }
        assert_eq!(session.transport.credential_requests(), 1);

        session.clock.advance(DAY);
        session
            .manager
            .get_authorization_for_today(&master_key)
            .await
            .expect("authorized from a new bundle");
        assert_eq!(session.transport.credential_requests(), 2);
        assert_eq!(
            session.transport.last_credential_path().as_deref(),
            Some(
                format!(
                    "/v1/certificate/auth/group?redemptionStartSeconds={}&redemptionEndSeconds={}",
                    DAY_ZERO + 7 * 86_400,
                    DAY_ZERO + 14 * 86_400
                )
                .as_str()
            )
        );
    }

    #[tokio::test]
    pub async fn every_presentation_is_fresh() {
        let session = test_session().await;
        let master_key = team_chat_master_key();

        let first = session
            .manager
            .get_authorization_for_today(&master_key)
            .await
            .expect("authorized");
        let second = session
            .manager
            .get_authorization_for_today(&master_key)
            .await
            .expect("authorized");

        assert_eq!(first.username, second.username);
        assert_ne!(first.password, second.password);
        assert!(!format!("{first:?}").contains(&first.password));
    }

    #[tokio::test]
    pub async fn pni_mismatch_fails_and_caches_nothing() {
        let session = test_session().await;
        let master_key = team_chat_master_key();
        session
            .transport
            .set_pni_override(Some(Pni::from_uuid(Uuid::from_u128(0xe1))));

        let error = session
            .manager
            .get_authorization_for_today(&master_key)
            .await
            .expect_err("credentials for someone else");
        assert!(matches!(error, GroupError::CredentialIdentityMismatch));
        assert_eq!(error.kind(), ErrorKind::Integrity);

        session.transport.set_pni_override(None);
        session
            .manager
            .get_authorization_for_today(&master_key)
            .await
            .expect("authorized");
        assert_eq!(session.transport.credential_requests(), 2);
    }

    #[tokio::test]
    pub async fn aci_mismatch_fails() {
        let session = test_session().await;
        session
            .transport
            .set_echoed_aci(Some(Aci::from_uuid(Uuid::from_u128(0xe2))));

        let error = session
            .manager
            .get_authorization_for_today(&team_chat_master_key())
            .await
            .expect_err("credentials for someone else");

        assert!(matches!(error, GroupError::CredentialIdentityMismatch));
    }

    #[tokio::test]
    pub async fn missing_aci_is_accepted() {
        let session = test_session().await;
        session.transport.set_echoed_aci(None);

        session
            .manager
            .get_authorization_for_today(&team_chat_master_key())
            .await
            .expect("only the PNI is checked");
    }

    #[tokio::test]
    pub async fn bad_status_is_a_transport_failure() {
        let session = test_session().await;
        session.transport.set_credential_status(500);

        let error = session
            .manager
            .get_authorization_for_today(&team_chat_master_key())
            .await
            .expect_err("server error");

        assert!(matches!(
            error,
            GroupError::BadStatus {
                stage: Stage::CredentialFetch,
                status: 500
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    pub async fn invalid_json_is_an_integrity_failure() {
        let session = test_session().await;
        session
            .transport
            .set_credential_body(Some(b"{\"credentials\": 12}".to_vec()));

        let error = session
            .manager
            .get_authorization_for_today(&team_chat_master_key())
            .await
            .expect_err("not a credential bundle");

        assert!(matches!(
            error,
            GroupError::Decode {
                stage: Stage::CredentialFetch,
                source: DecodeError::Json(_)
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert!(error.to_string().contains("invalid JSON"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[tokio::test]
    pub async fn bundle_without_today_is_fatal() {
        let session = test_session().await;
        session.transport.omit_first_day(true);

        let error = session
            .manager
            .get_authorization_for_today(&team_chat_master_key())
            .await
            .expect_err("no credential for today");

        assert!(matches!(error, GroupError::NoCredentialForToday(day) if day.as_epoch_seconds() == DAY_ZERO));

        // The bundle was still kept, and serves tomorrow
        session.clock.advance(DAY);
        session
            .manager
            .get_authorization_for_today(&team_chat_master_key())
            .await
            .expect("tomorrow is covered");
        assert_eq!(session.transport.credential_requests(), 1);
    }

    #[tokio::test]
    pub async fn concurrent_callers_share_one_credential_fetch() {
        let session = test_session().await;
        let master_key = team_chat_master_key();
        session.transport.set_delay(Duration::from_millis(50));

        let (first, second) = tokio::join!(
            session.manager.get_authorization_for_today(&master_key),
            session.manager.get_authorization_for_today(&master_key),
        );

        first.expect("first caller authorized");
        second.expect("second caller authorized");
        assert_eq!(session.transport.credential_requests(), 1);
    }
}
