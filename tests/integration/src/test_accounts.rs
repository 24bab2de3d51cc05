//! Account loading against a real accounts table.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use aws_sdk_dynamodb::types::AttributeValue;
    use sgupdater_core::{
        AccountRepository, EntryError, InvalidEntryPolicy, ValidationError, load_accounts,
    };
    use sgupdater_dynamodb::DynamoDbAccountRepository;

    use crate::{cleanup_table, create_accounts_table, dynamodb_client, put_item};

    fn s(v: &str) -> AttributeValue {
        AttributeValue::S(v.to_owned())
    }

    fn account_item(entry_id: &str, account_id: &str, regions: &[&str]) -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("EntryID".to_owned(), s(entry_id)),
            ("AccountID".to_owned(), s(account_id)),
            (
                "Regions".to_owned(),
                AttributeValue::L(regions.iter().map(|r| s(r)).collect()),
            ),
        ])
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_load_and_default_account_entries() {
        let client = dynamodb_client();
        let table = create_accounts_table(&client, "accounts").await;

        put_item(&client, &table, account_item("a", "111111111111", &["us-east-1"])).await;
        let mut custom = account_item("b", "222222222222", &["eu-west-1", "eu-central-1"]);
        custom.insert(
            "AllowPorts".to_owned(),
            AttributeValue::Ns(vec!["8443".to_owned()]),
        );
        custom.insert("DurationSeconds".to_owned(), AttributeValue::N("900".to_owned()));
        custom.insert("ExternalID".to_owned(), s("ext-b"));
        put_item(&client, &table, custom).await;

        let repo = DynamoDbAccountRepository::new(client.clone(), &table);
        let report = load_accounts(&repo).await.unwrap();

        assert!(report.is_clean());
        let mut accounts = report.into_accounts();
        accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));

        assert_eq!(accounts[0].allow_ports, BTreeSet::from([80, 443]));
        assert_eq!(accounts[0].duration_seconds, 1800);
        assert_eq!(accounts[0].role_name, "STS-UpdateSonarCloudSecurityGroupsRole");

        assert_eq!(accounts[1].allow_ports, BTreeSet::from([8443]));
        assert_eq!(accounts[1].duration_seconds, 900);
        assert_eq!(accounts[1].external_id.as_deref(), Some("ext-b"));
        assert_eq!(
            accounts[1].regions,
            vec!["eu-west-1".to_owned(), "eu-central-1".to_owned()]
        );

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_invalid_entries_without_aborting() {
        let client = dynamodb_client();
        let table = create_accounts_table(&client, "invalid").await;

        put_item(&client, &table, account_item("ok-1", "111", &["us-east-1"])).await;
        put_item(&client, &table, account_item("ok-2", "222", &["us-west-2"])).await;
        put_item(
            &client,
            &table,
            HashMap::from([
                ("EntryID".to_owned(), s("no-regions")),
                ("AccountID".to_owned(), s("333")),
            ]),
        )
        .await;

        let repo = DynamoDbAccountRepository::new(client.clone(), &table);
        let report = load_accounts(&repo).await.unwrap();

        assert_eq!(report.accounts.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].entry_id.as_deref(), Some("no-regions"));
        assert_eq!(
            report.rejected[0].error,
            EntryError::Validation(ValidationError::MissingRegions)
        );
        assert!(
            report
                .clone()
                .apply_policy(InvalidEntryPolicy::Fail)
                .is_err()
        );

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_scan_across_pages() {
        let client = dynamodb_client();
        let table = create_accounts_table(&client, "paged").await;

        // ~4 KB per item pushes the scan past the 1 MB page limit.
        let padding = "x".repeat(4096);
        for i in 0..300 {
            let mut item = account_item(&format!("entry-{i}"), &format!("{i:012}"), &["us-east-1"]);
            item.insert("Description".to_owned(), s(&padding));
            put_item(&client, &table, item).await;
        }

        let repo = DynamoDbAccountRepository::new(client.clone(), &table);
        let items = repo.fetch_all().await.unwrap();
        assert_eq!(items.len(), 300);

        let report = load_accounts(&repo).await.unwrap();
        let ids: BTreeSet<_> = report.accounts.iter().map(|a| a.account_id.clone()).collect();
        assert_eq!(ids.len(), 300);

        cleanup_table(&client, &table).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_batch_when_table_is_missing() {
        let client = dynamodb_client();
        let repo = DynamoDbAccountRepository::new(client, "sgupdater-missing-table");

        let err = load_accounts(&repo).await.unwrap_err();

        assert_eq!(err.collection(), "sgupdater-missing-table");
    }
}
