/// Tests for ParamsParser and DynParams

use super::*;
use glam::Vec3;

fn sig(text: &str) -> Signature {
    text.parse().unwrap()
}

// ============================================================================
// Tests: ParamsParser
// ============================================================================

#[test]
fn test_parser_quote_styles() {
    let pairs: Vec<_> = ParamsParser::new(r#"A="one two" B='three' C=four"#).collect();
    assert_eq!(pairs, vec![("A", "one two"), ("B", "three"), ("C", "four")]);
}

#[test]
fn test_parser_empty_values() {
    let pairs: Vec<_> = ParamsParser::new(r#"Empty="" Bare= Next="x""#).collect();
    assert_eq!(pairs, vec![("Empty", ""), ("Bare", ""), ("Next", "x")]);
}

#[test]
fn test_parser_skips_stray_tokens() {
    let pairs: Vec<_> = ParamsParser::new("junk Name=\"a\"  =orphan Other=b").collect();
    assert_eq!(pairs, vec![("Name", "a"), ("Other", "b")]);
}

#[test]
fn test_parser_unterminated_quote() {
    let pairs: Vec<_> = ParamsParser::new("Name=\"open ended").collect();
    assert_eq!(pairs, vec![("Name", "open ended")]);
}

#[test]
fn test_parser_empty_input() {
    assert_eq!(ParamsParser::new("   ").count(), 0);
}

// ============================================================================
// Tests: DynParams
// ============================================================================

#[test]
fn test_new_params_have_defaults() {
    let params = DynParams::new(sig("int(float,string)"));
    assert_eq!(params.len(), 2);
    assert_eq!(params.get(0), Some(&Var::Float(0.0)));
    assert_eq!(params.get(1), Some(&Var::String(String::new())));
    assert_eq!(params.return_value(), &Var::Int(0));
}

#[test]
fn test_from_values_builds_signature() {
    let params = DynParams::from_values(VarType::Void, vec![Var::Int(1), Var::Vec3(Vec3::ONE)]);
    assert_eq!(params.signature().to_string(), "void(int,vec3)");
    assert_eq!(params.arg::<Vec3>(1), Some(Vec3::ONE));
}

#[test]
fn test_from_string_positional() {
    let params = DynParams::from_string(sig("void(int,float)"), r#"Param0="1" Param1="2.5""#);
    assert_eq!(params.arg::<i32>(0), Some(1));
    assert_eq!(params.arg::<f32>(1), Some(2.5));
}

#[test]
fn test_from_string_missing_and_malformed_default() {
    let params = DynParams::from_string(sig("void(int,vec3,bool)"), r#"Param0="abc" Param1="1 2 3""#);
    assert_eq!(params.arg::<i32>(0), Some(0));
    assert_eq!(params.arg::<Vec3>(1), Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(params.arg::<bool>(2), Some(false));
}

#[test]
fn test_from_table_by_name() {
    let table: toml::Table = toml::from_str("Param1 = 4\nParam0 = \"Camera\"").unwrap();
    let params = DynParams::from_table(sig("void(string,uint)"), &table);
    assert_eq!(params.arg::<String>(0), Some("Camera".to_string()));
    assert_eq!(params.arg::<u32>(1), Some(4));
}

#[test]
fn test_set_checks_type() {
    let mut params = DynParams::new(sig("void(int)"));
    assert!(params.set(0, Var::Int(9)));
    assert!(!params.set(0, Var::Float(9.0)));
    assert!(!params.set(1, Var::Int(9)));
    assert_eq!(params.arg::<i32>(0), Some(9));
}

#[test]
fn test_return_slot() {
    let mut params = DynParams::new(sig("float()"));
    assert!(!params.set_return_value(Var::Int(1)));
    assert!(params.set_return_value(Var::Float(1.5)));
    assert_eq!(params.take_return_value(), Var::Float(1.5));
    assert_eq!(params.return_value(), &Var::Float(0.0));
}

#[test]
fn test_display_reparses() {
    let params = DynParams::from_values(VarType::Void, vec![Var::Int(-4), Var::String("a b".into())]);
    let text = params.to_string();
    assert_eq!(text, r#"Param0="-4" Param1="a b""#);
    assert_eq!(DynParams::from_string(params.signature().clone(), &text), params);
}
