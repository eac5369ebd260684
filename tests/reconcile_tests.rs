use franvaro::{
    add_absence, build_document, extract_cases, generate, next_specification_number, parse,
    remove_absence, validate, AbsenceType, Children, ErrorKind, NewAbsence,
};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Skatteverket xmlns="http://xmls.skatteverket.se/se/skatteverket/da" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <Avsandare>
    <Programnamn>lonesystemet</Programnamn>
    <Organisationsnummer>165560269986</Organisationsnummer>
    <TekniskKontaktperson>
      <Namn>Anna Andersson</Namn>
      <Telefon>0812345678</Telefon>
      <Epostadress>anna.andersson@example.se</Epostadress>
    </TekniskKontaktperson>
    <Skapad>2024-02-01T09:30:00</Skapad>
  </Avsandare>
  <Blankett>
    <Arendeinformation>
      <Arendeagare>165560269986</Arendeagare>
      <Period>202401</Period>
    </Arendeinformation>
    <Blankettinnehall>
      <IU>
        <InkomsttagareIUGROUP>
          <InkomsttagareIU>
            <Inkomsttagare>198001052384</Inkomsttagare>
          </InkomsttagareIU>
        </InkomsttagareIUGROUP>
      </IU>
    </Blankettinnehall>
  </Blankett>
  <Blankett>
    <Arendeinformation>
      <Arendeagare>165560269986</Arendeagare>
      <Period>202402</Period>
    </Arendeinformation>
    <Blankettinnehall>
      <IU>
        <InkomsttagareIUGROUP>
          <InkomsttagareIU>
            <Inkomsttagare>197505124571</Inkomsttagare>
          </InkomsttagareIU>
        </InkomsttagareIUGROUP>
      </IU>
    </Blankettinnehall>
  </Blankett>
  <Franvarouppgift>
    <AgRegistreradId faltkod="201">165560269986</AgRegistreradId>
    <Inkomsttagare faltkod="215">198001052384</Inkomsttagare>
    <Franvarodatum faltkod="821">2024-01-15</Franvarodatum>
    <Specifikationsnummer faltkod="822">1</Specifikationsnummer>
    <Franvarotyp faltkod="823">FORALDRAPENNING</Franvarotyp>
    <RedovisningsPeriod faltkod="006">202401</RedovisningsPeriod>
    <ProcentFP faltkod="826">100</ProcentFP>
  </Franvarouppgift>
  <Franvarouppgift>
    <AgRegistreradId faltkod="201">165560269986</AgRegistreradId>
    <Inkomsttagare faltkod="215">198001052384</Inkomsttagare>
    <Franvarodatum faltkod="821">2024-01-22</Franvarodatum>
    <Specifikationsnummer faltkod="822">2</Specifikationsnummer>
    <Franvarotyp faltkod="823">TILLFALLIG_FORALDRAPENNING</Franvarotyp>
    <RedovisningsPeriod faltkod="006">202401</RedovisningsPeriod>
    <TimmarTFP faltkod="825">8</TimmarTFP>
  </Franvarouppgift>
  <Franvarouppgift>
    <AgRegistreradId faltkod="201">165560269986</AgRegistreradId>
    <Inkomsttagare faltkod="215">197505124571</Inkomsttagare>
    <Franvarodatum faltkod="821">2024-02-05</Franvarodatum>
    <Specifikationsnummer faltkod="822">1</Specifikationsnummer>
    <Franvarotyp faltkod="823">FORALDRAPENNING</Franvarotyp>
    <RedovisningsPeriod faltkod="006">202402</RedovisningsPeriod>
    <ProcentFP faltkod="826">50</ProcentFP>
  </Franvarouppgift>
</Skatteverket>
"#;

#[test]
fn test_extract_cases_matches_on_recipient_and_period() -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let cases = extract_cases(&document);

    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0].recipient_id, "198001052384");
    assert_eq!(cases[0].period, "202401");
    assert_eq!(cases[0].owner_id, "165560269986");
    assert_eq!(cases[0].absences.len(), 2);
    assert_eq!(cases[0].last_absence_date.as_deref(), Some("2024-01-22"));

    assert_eq!(cases[1].recipient_id, "197505124571");
    assert_eq!(cases[1].period, "202402");
    assert_eq!(cases[1].absences.len(), 1);
    assert_eq!(cases[1].last_absence_date.as_deref(), Some("2024-02-05"));
    Ok(())
}

#[test]
fn test_unmatched_absences_are_dropped_on_rebuild() -> Result<(), Box<dyn std::error::Error>> {
    let stray = r#"  <Franvarouppgift>
    <AgRegistreradId faltkod="201">165560269986</AgRegistreradId>
    <Inkomsttagare faltkod="215">198001052384</Inkomsttagare>
    <Franvarodatum faltkod="821">2099-12-01</Franvarodatum>
    <Specifikationsnummer faltkod="822">9</Specifikationsnummer>
    <Franvarotyp faltkod="823">FORALDRAPENNING</Franvarotyp>
    <RedovisningsPeriod faltkod="006">209912</RedovisningsPeriod>
    <ProcentFP faltkod="826">25</ProcentFP>
  </Franvarouppgift>
</Skatteverket>
"#;
    let document = parse(&DECLARATION.replace("</Skatteverket>\n", stray))?;
    let cases = extract_cases(&document);
    assert_eq!(cases.len(), 2);
    assert!(cases.iter().all(|c| c.period != "209912"));

    let rebuilt = build_document(&document, &cases);
    let output = generate(&rebuilt)?;
    assert_eq!(output.matches("<Franvarouppgift>").count(), 3);
    assert!(!output.contains("209912"));
    Ok(())
}

#[test]
fn test_add_absence_assigns_next_specification_number(
) -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let cases = extract_cases(&document);

    assert_eq!(next_specification_number(&cases[0].absences), 3);
    assert_eq!(next_specification_number(&[]), 1);

    let input = NewAbsence {
        date: "2024-01-29".to_string(),
        absence_type: AbsenceType::Foraldrapenning,
        percent: Some("75".to_string()),
        hours: None,
    };
    let absences = add_absence(&cases[0], &input);
    assert_eq!(absences.len(), 3);

    let added = &absences[2];
    assert_eq!(added.specification_number, 3);
    assert_eq!(added.employer_id, cases[0].owner_id);
    assert_eq!(added.recipient_id, cases[0].recipient_id);
    assert_eq!(added.period, cases[0].period);
    assert_eq!(added.date, "2024-01-29");
    assert_eq!(added.absence_type, Some(AbsenceType::Foraldrapenning));
    assert_eq!(added.percent_fp.as_deref(), Some("75"));
    assert_eq!(added.hours_fp, None);
    assert_eq!(added.percent_tfp, None);
    assert_eq!(added.hours_tfp, None);
    Ok(())
}

#[test]
fn test_add_absence_routes_values_by_type() -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let cases = extract_cases(&document);

    let input = NewAbsence {
        date: "2024-02-12".to_string(),
        absence_type: AbsenceType::TillfalligForaldrapenning,
        percent: None,
        hours: Some("4".to_string()),
    };
    let absences = add_absence(&cases[1], &input);
    let added = &absences[1];
    assert_eq!(added.specification_number, 2);
    assert_eq!(added.hours_tfp.as_deref(), Some("4"));
    assert_eq!(added.percent_tfp, None);
    assert_eq!(added.percent_fp, None);
    assert_eq!(added.hours_fp, None);
    Ok(())
}

#[test]
fn test_remove_absence_checks_bounds() -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let cases = extract_cases(&document);

    let remaining = remove_absence(&cases[0], 0)?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].date, "2024-01-22");

    let err = remove_absence(&cases[0], 2).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::IndexOutOfRange { index: 2, len: 2 });
    Ok(())
}

#[test]
fn test_rebuild_replaces_collection_and_program_name(
) -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let mut cases = extract_cases(&document);

    let input = NewAbsence {
        date: "2024-01-29".to_string(),
        absence_type: AbsenceType::Foraldrapenning,
        percent: Some("75".to_string()),
        hours: None,
    };
    let updated = add_absence(&cases[0], &input);
    cases[0] = cases[0].clone().with_absences(updated);
    assert_eq!(cases[0].last_absence_date.as_deref(), Some("2024-01-29"));

    let rebuilt = build_document(&document, &cases);
    let output = generate(&rebuilt)?;
    assert_eq!(output.matches("<Franvarouppgift>").count(), 4);
    assert!(output.contains("<Programnamn>franvaro</Programnamn>"));

    let report = validate(&output);
    assert!(report.valid, "unexpected errors: {:?}", report.errors);

    // The input tree is shared with the caller and must stay untouched.
    assert_eq!(document, parse(DECLARATION)?);
    Ok(())
}

#[test]
fn test_rebuild_without_cases_drops_collection() -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let rebuilt = build_document(&document, &[]);

    let reparsed = parse(&generate(&rebuilt)?)?;
    let root = match reparsed.child("Skatteverket") {
        Some(Children::One(root)) => root,
        other => panic!("expected single root, got {other:?}"),
    };
    assert!(root.child("Franvarouppgift").is_none());
    Ok(())
}

#[test]
fn test_session_surfaces_validator_errors() -> Result<(), Box<dyn std::error::Error>> {
    let document = parse(DECLARATION)?;
    let mut cases = extract_cases(&document);

    let input = NewAbsence {
        date: "2024-01-29".to_string(),
        absence_type: AbsenceType::Foraldrapenning,
        percent: Some("  ".to_string()),
        hours: None,
    };
    let updated = add_absence(&cases[0], &input);
    cases[0] = cases[0].clone().with_absences(updated);

    let output = generate(&build_document(&document, &cases))?;
    let report = validate(&output);
    assert!(!report.valid);
    assert!(report
        .errors
        .iter()
        .any(|e| e.contains("ProcentFP or TimmarFP")));
    Ok(())
}
