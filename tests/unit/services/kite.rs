//! Unit tests for Kite instrument lookup

use tradepilot::services::kite::{parse_instruments_csv, InstrumentKey};

#[test]
fn test_instrument_key_parsing() {
    let key = InstrumentKey::parse("bse:infy", "NSE");
    assert_eq!(key.exchange, "BSE");
    assert_eq!(key.tradingsymbol, "INFY");

    let bare = InstrumentKey::parse("reliance", "NSE");
    assert_eq!(bare.exchange, "NSE");
    assert_eq!(bare.tradingsymbol, "RELIANCE");
}

#[test]
fn test_parse_instruments_csv() {
    let csv = "instrument_token,exchange_token,tradingsymbol,name,last_price,expiry,strike,tick_size,lot_size,instrument_type,segment,exchange\n\
               408065,1594,INFY,\"INFOSYS, LTD\",0,,0,0.05,1,EQ,NSE,NSE\n\
               738561,2885,RELIANCE,RELIANCE INDUSTRIES,0,,0,0.05,1,EQ,NSE,NSE\n";
    let tokens = parse_instruments_csv(csv).unwrap();
    assert_eq!(tokens.get("INFY"), Some(&408065));
    assert_eq!(tokens.get("RELIANCE"), Some(&738561));
}

#[test]
fn test_parse_instruments_csv_requires_columns() {
    assert!(parse_instruments_csv("").is_err());
    assert!(parse_instruments_csv("foo,bar\n1,2\n").is_err());
}
