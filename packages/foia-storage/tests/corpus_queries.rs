use time::macros::{date, datetime};

use foia_config::Postgres;
use foia_storage::{
	db::Db,
	queries::{self, SqlParam},
};
use foia_testkit::TestDatabase;

async fn seed(db: &Db) {
	for (entity_id, entity, enttype) in [
		(1, "Anthony Fauci", "PERSON"),
		(2, "CDC", "ORG"),
		(3, "China", "GPE"),
		(4, "Bethesda", "FAC"),
		(5, "Chinese", "NORP"),
		(6, "Anthony Fauci", "PERSON"),
		(900, "Noise Person", "PERSON"),
	] {
		sqlx::query("INSERT INTO covid19.entities (entity_id, entity, enttype) VALUES ($1, $2, $3)")
			.bind(entity_id)
			.bind(entity)
			.bind(enttype)
			.execute(&db.pool)
			.await
			.expect("Failed to insert entity.");
	}

	let emails: [(i32, i32, _, Option<&str>, Vec<&str>); 3] = [
		(1, 10, datetime!(2020-01-23 8:00), Some("vaccine"), vec!["Anthony Fauci"]),
		(2, 11, datetime!(2020-02-01 12:30), None, vec![r#"Smith, "Bob" {Jr}"#]),
		(3, 12, datetime!(2020-05-06 23:59), Some("masks"), vec!["CDC", "China"]),
	];

	for (email_id, pg_number, sent, topic, entities) in emails {
		sqlx::query(
			"\
INSERT INTO covid19.fauci_emails (email_id, pg_number, sent, subject, top_topic, entities, body)
VALUES ($1, $2, $3, 'subject', $4, $5, 'body text')",
		)
		.bind(email_id)
		.bind(pg_number)
		.bind(sent)
		.bind(topic)
		.bind(entities.iter().map(|entity| entity.to_string()).collect::<Vec<_>>())
		.execute(&db.pool)
		.await
		.expect("Failed to insert email.");
		sqlx::query("INSERT INTO covid19.emails (email_id, file_id, sent) VALUES ($1, 1000, $2)")
			.bind(email_id)
			.bind(sent)
			.execute(&db.pool)
			.await
			.expect("Failed to insert volume row.");
	}
}

async fn connect(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	seed(&db).await;

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FOIA_PG_DSN to run."]
async fn entity_labels_are_distinct_sorted_and_bounded() {
	let Some(base_dsn) = foia_testkit::env_dsn() else {
		eprintln!("Skipping entity_labels_are_distinct_sorted_and_bounded; set FOIA_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let persons = queries::list_entity_labels(&db, &["PERSON"], 515).await.expect("persons");
	let locations = queries::list_entity_labels(&db, &["GPE", "LOC", "NORP", "FAC"], 515)
		.await
		.expect("locations");

	assert_eq!(persons, vec!["Anthony Fauci".to_string()]);
	assert_eq!(locations, vec!["Bethesda".to_string(), "China".to_string(), "Chinese".to_string()]);
	assert!(queries::list_entity_labels(&db, &[], 515).await.is_err());

	let topics = queries::list_topic_labels(&db).await.expect("topics");

	assert_eq!(topics, vec!["masks".to_string(), "vaccine".to_string()]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FOIA_PG_DSN to run."]
async fn structural_characters_are_bound_as_data() {
	let Some(base_dsn) = foia_testkit::env_dsn() else {
		eprintln!("Skipping structural_characters_are_bound_as_data; set FOIA_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let statement = "\
SELECT email_id, pg_number, sent, subject, from_email, to_emails, top_topic, entities
FROM covid19.fauci_emails
WHERE entities && $1::text[]
ORDER BY sent, email_id";
	let rows = queries::fetch_emails(
		&db,
		statement,
		&[SqlParam::TextArray(vec![r#"Smith, "Bob" {Jr}"#.to_string()])],
	)
	.await
	.expect("Failed to run search.");

	assert_eq!(rows.iter().map(|row| row.email_id).collect::<Vec<_>>(), vec![2]);

	// The comma-separated pieces must not match on their own.
	let rows = queries::fetch_emails(
		&db,
		statement,
		&[SqlParam::TextArray(vec!["Smith".to_string(), r#""Bob" {Jr}"#.to_string()])],
	)
	.await
	.expect("Failed to run search.");

	assert!(rows.is_empty());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set FOIA_PG_DSN to run."]
async fn daily_volume_groups_by_sent_date() {
	let Some(base_dsn) = foia_testkit::env_dsn() else {
		eprintln!("Skipping daily_volume_groups_by_sent_date; set FOIA_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = connect(&test_db).await;
	let volume = queries::daily_volume(&db, 1_000, date!(2020 - 02 - 01)).await.expect("volume");

	assert_eq!(volume.len(), 2);
	assert_eq!(volume[0].date, date!(2020 - 02 - 01));
	assert_eq!(volume[0].emails, 1);
	assert_eq!(volume[1].date, date!(2020 - 05 - 06));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
