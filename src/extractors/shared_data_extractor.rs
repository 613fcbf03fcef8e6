//! Embedded page state extraction
//!
//! Finds the `window._sharedData = {...};` assignment in the markup, decodes
//! it, and walks the post-page structure for carousel image URLs.
//!
//! The literal is decoded as strict JSON first. Older page builds emit a
//! plain JS object literal instead, so on failure the span is parsed with SWC
//! and converted to JSON.

use regex::Regex;
use serde_json::Value;
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};
use tracing::debug;

use crate::error::DecodeError;

/// Decode the first `window.<variable> = {...};` assignment in `html`.
///
/// Returns `None` if there is no such assignment or it does not decode.
pub fn extract_shared_data(html: &str, variable: &str) -> Option<Value> {
    let literal = find_assigned_literal(html, variable)?;

    match decode_literal(literal) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(variable, error = %e, "failed to parse shared data");
            None
        }
    }
}

/// Carousel image URLs from decoded embedded state.
///
/// Sidecar children are returned in order; a single-image post yields its one
/// `display_url`. Any missing key along the way yields nothing.
pub fn extract_carousel_images(state: Option<&Value>) -> Vec<String> {
    let Some(media) = state.and_then(shortcode_media) else {
        return Vec::new();
    };

    if let Some(edges) = media
        .get("edge_sidecar_to_children")
        .and_then(|sidecar| sidecar.get("edges"))
        .and_then(Value::as_array)
    {
        return edges
            .iter()
            .filter_map(|edge| edge.get("node")?.get("display_url")?.as_str())
            .map(String::from)
            .collect();
    }

    media
        .get("display_url")
        .and_then(Value::as_str)
        .map(|url| vec![url.to_string()])
        .unwrap_or_default()
}

fn shortcode_media(state: &Value) -> Option<&Value> {
    state
        .get("entry_data")?
        .get("PostPage")?
        .as_array()?
        .first()?
        .get("graphql")?
        .get("shortcode_media")
}

/// Slice out the object literal assigned to `window.<variable>`, ending at
/// the first `;` outside any braces or string literal.
fn find_assigned_literal<'a>(html: &'a str, variable: &str) -> Option<&'a str> {
    let pattern = format!(r"window\.{}\s*=\s*\{{", regex::escape(variable));
    let re = Regex::new(&pattern).ok()?;
    let found = re.find(html)?;

    // Back up onto the opening brace the pattern consumed
    let start = found.end() - 1;
    let rest = &html[start..];

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => return Some(rest[..i].trim_end()),
            _ => {}
        }
    }

    None
}

fn decode_literal(literal: &str) -> Result<Value, DecodeError> {
    match serde_json::from_str(literal) {
        Ok(value) => Ok(value),
        Err(json_err) => {
            debug!(error = %json_err, "not strict JSON, trying as JS literal");
            parse_js_literal(literal).ok_or(DecodeError::Json(json_err))
        }
    }
}

/// Parse `literal` as the initializer of a throwaway `var` and convert it.
fn parse_js_literal(literal: &str) -> Option<Value> {
    let source = format!("var __state = {literal};");

    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), source);

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );

    let mut parser = Parser::new_from(lexer);
    let script = parser.parse_script().ok()?;

    match script.body.first()? {
        Stmt::Decl(Decl::Var(var_decl)) => {
            let init = var_decl.decls.first()?.init.as_ref()?;
            expr_to_json(init)
        }
        _ => None,
    }
}

/// Convert a literal-only JavaScript expression to JSON
fn expr_to_json(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(Value::String(s.value.as_str().unwrap_or("").to_string())),

        Expr::Lit(Lit::Num(n)) => number_to_json(n.value),

        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),

        Expr::Lit(Lit::Null(_)) => Some(Value::Null),

        Expr::Object(obj) => {
            let mut map = serde_json::Map::new();
            for prop in &obj.props {
                if let PropOrSpread::Prop(prop) = prop {
                    if let Prop::KeyValue(kv) = &**prop {
                        let key = prop_name_to_string(&kv.key)?;
                        let value = expr_to_json(&kv.value)?;
                        map.insert(key, value);
                    }
                }
            }
            Some(Value::Object(map))
        }

        Expr::Array(arr) => {
            let values = arr
                .elems
                .iter()
                .map(|elem| {
                    elem.as_ref()
                        .and_then(|ExprOrSpread { expr, .. }| expr_to_json(expr))
                        .unwrap_or(Value::Null)
                })
                .collect();
            Some(Value::Array(values))
        }

        // JSON.parse('...')
        Expr::Call(call) if is_json_parse_call(call) => {
            let ExprOrSpread { expr: arg, .. } = call.args.first()?;
            match &**arg {
                Expr::Lit(Lit::Str(s)) => serde_json::from_str(s.value.as_str()?).ok(),
                _ => None,
            }
        }

        Expr::Unary(unary) if unary.op == UnaryOp::Minus => match &*unary.arg {
            Expr::Lit(Lit::Num(n)) => number_to_json(-n.value),
            _ => None,
        },

        Expr::Paren(paren) => expr_to_json(&paren.expr),

        _ => None,
    }
}

fn number_to_json(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(Value::Number(serde_json::Number::from(n as i64)))
    } else {
        serde_json::Number::from_f64(n).map(Value::Number)
    }
}

fn is_json_parse_call(call: &CallExpr) -> bool {
    if let Callee::Expr(expr) = &call.callee {
        if let Expr::Member(member) = &**expr {
            if let Expr::Ident(obj) = &*member.obj {
                if let MemberProp::Ident(prop) = &member.prop {
                    return obj.sym.as_ref() == "JSON" && prop.sym.as_ref() == "parse";
                }
            }
        }
    }
    false
}

fn prop_name_to_string(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.as_str().to_string()),
        PropName::Str(s) => s.value.as_str().map(|v| v.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
