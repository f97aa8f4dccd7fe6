//! Interactive programs driven through stdin, end to end.

mod common;

use common::TestEnv;

#[test]
fn test_students_persist_between_sessions() {
    let env = TestEnv::new();
    env.run_menu("students", "1\nS1\nAna\nCruz\nBSIT\n2\n7\n");

    let out = env.run_menu("students", "2\n7\n");
    assert!(out.contains("S1 | Ana Cruz | BSIT | Year 2"));
}

#[test]
fn test_end_of_input_leaves_menu_cleanly() {
    let env = TestEnv::new();
    env.command()
        .arg("library")
        .write_stdin("1\nB1\nDune\n")
        .assert()
        .success();
}

#[test]
fn test_invalid_choice_is_reprompted() {
    let env = TestEnv::new();
    let out = env.run_menu("cart", "9\nabc\n6\n");
    assert_eq!(out.matches("Invalid choice. Try again.").count(), 2);
}

#[test]
fn test_bank_uses_configured_savings_minimum() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.data_dir).unwrap();
    std::fs::write(
        env.data_dir.join("config.yaml"),
        "bank:\n  savings_minimum_balance: 100\n",
    )
    .unwrap();

    let out = env.run_menu("bank", "1\nA1\nAna\nSavings\n1000\n3\nA1\n900\n5\n");
    assert!(out.contains("Withdrew 900.00. New balance: 100.00"));
}

#[test]
fn test_low_stock_threshold_from_environment() {
    let env = TestEnv::new();
    let output = env
        .command()
        .env("FRONTDESK_LOW_STOCK_THRESHOLD", "3")
        .arg("inventory")
        .write_stdin("1\nP1\nPen\nStationery\n4\n2.50\n8\n1\n3\n9\n")
        .output()
        .unwrap();
    let out = String::from_utf8(output.stdout).unwrap();
    assert!(out.contains("Products with fewer than 3 units:"));
    assert!(out.contains("No products are low on stock."));
}

#[test]
fn test_transport_seats_are_shared_across_sessions() {
    let env = TestEnv::new();
    env.run_menu(
        "transport",
        "2\n1\nT1\nManila-Baguio\n2030-06-01\n08:30\n1\n550\n6\n3\n",
    );
    env.run_menu("transport", "1\n2\nR1\nAna\n0917\nT1\n1\nPaid\n4\n3\n");

    let out = env.run_menu("transport", "1\n2\nR2\nBen\n0918\nT1\n1\nPaid\n4\n3\n");
    assert!(out.contains("Error: no capacity left"));

    let reservations = env.list_json("reservations");
    assert_eq!(reservations.as_array().unwrap().len(), 1);
    assert_eq!(reservations[0]["passenger_name"], "Ana");
}

#[test]
fn test_quiz_files_live_in_data_dir() {
    let env = TestEnv::new();
    env.run_menu(
        "quiz",
        "1\n2\nQ1\n2+2?\n4\n3\n5\n6\nA\n6\n2\nS1\nAna\nA\n3\n",
    );

    assert!(env.data_dir.join("quiz_questions.txt").exists());
    let results = std::fs::read_to_string(env.data_dir.join("quiz_results.txt")).unwrap();
    assert!(results.starts_with("S1|Ana|1/1|"));

    let questions = env.list_json("questions");
    assert_eq!(questions[0]["correct"], "A");
}

#[test]
fn test_smart_home_save_and_list_devices() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.data_dir).unwrap();
    env.run_menu("smart-home", "1\nL1\nLamp\nlight\n70\n2\nL1\ny\n5\n8\n");

    let saved = std::fs::read_to_string(env.data_dir.join("devices.txt")).unwrap();
    assert_eq!(saved.trim(), "L1|Lamp|ON|LIGHT|70|");

    let devices = env.list_json("devices");
    assert_eq!(devices[0]["brightness"], 70);
    assert_eq!(devices[0]["on"], true);
}
