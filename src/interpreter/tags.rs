//! Tag-expression evaluation (spec §4.7): turning a parsed `Tag` AST node
//! into a `Value::Tag`, the runtime's rendered-tree representation.
//!
//! A capitalized tag name (`<Widget/>`) is a component reference rather than
//! a literal element: if it resolves to a `Function` in scope, that function
//! is called with a single props dictionary (attrs plus a `children` array)
//! and its return value stands in for the tag entirely (spec §4.7).

use super::Interpreter;
use crate::ast::{Tag, TagChild};
use crate::environment::Environment;
use crate::error::ParsleyError;
use crate::value::{TagNode, TagValue, Value};
use std::collections::BTreeMap;
use std::rc::Rc;

pub fn eval_tag(interp: &Interpreter, tag: &Tag, env: &Environment) -> Result<Value, ParsleyError> {
    if let Some(name) = &tag.name {
        if is_component_name(name) {
            if let Some(func @ Value::Function(_)) = env.get(name) {
                return call_component(interp, &func, tag, env);
            }
        }
    }
    Ok(Value::Tag(Rc::new(eval_tag_value(interp, tag, env)?)))
}

fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

fn call_component(interp: &Interpreter, func: &Value, tag: &Tag, env: &Environment) -> Result<Value, ParsleyError> {
    let mut props = BTreeMap::new();
    for attr in &tag.attrs {
        let value = match &attr.value {
            Some(expr) => interp.eval(expr, env)?,
            None => Value::Boolean(true),
        };
        props.insert(attr.name.clone(), value);
    }
    let mut children = Vec::with_capacity(tag.children.len());
    for child in &tag.children {
        children.push(eval_tag_child_value(interp, child, env)?);
    }
    props.insert("children".to_string(), Value::new_array(children));
    interp.call_function(func, &[Value::new_dict(props)], &tag.position, None)
}

fn eval_tag_value(interp: &Interpreter, tag: &Tag, env: &Environment) -> Result<TagValue, ParsleyError> {
    let mut attrs = Vec::with_capacity(tag.attrs.len());
    for attr in &tag.attrs {
        let value = match &attr.value {
            Some(expr) => interp.eval(expr, env)?,
            None => Value::Boolean(true),
        };
        attrs.push((attr.name.clone(), value));
    }

    let mut children = Vec::with_capacity(tag.children.len());
    for child in &tag.children {
        children.push(eval_tag_child(interp, child, env)?);
    }

    Ok(TagValue {
        name: tag.name.clone(),
        attrs,
        children,
        self_closing: tag.self_closing,
    })
}

/// A child's value as it would appear inside a component's `children` prop
/// array — text becomes a `String`, nested tags stay `Value::Tag` so a
/// component can inspect/re-render them.
fn eval_tag_child_value(interp: &Interpreter, child: &TagChild, env: &Environment) -> Result<Value, ParsleyError> {
    Ok(match child {
        TagChild::Text(text) => Value::String(text.clone()),
        TagChild::Expr(expr) => interp.eval(expr, env)?,
        TagChild::Tag(nested) => eval_tag(interp, nested, env)?,
    })
}

fn eval_tag_child(interp: &Interpreter, child: &TagChild, env: &Environment) -> Result<TagNode, ParsleyError> {
    Ok(match child {
        TagChild::Text(text) => TagNode::Text(text.clone()),
        TagChild::Expr(expr) => value_to_node(interp.eval(expr, env)?),
        TagChild::Tag(nested) => value_to_node(eval_tag(interp, nested, env)?),
    })
}

/// Flattens a `{list}` interpolation the same way a fragment of sibling tags
/// does (spec §4.7.2), and lets a component's non-tag return value fall back
/// to plain stringified content.
fn value_to_node(value: Value) -> TagNode {
    match value {
        Value::Tag(t) => TagNode::Tag((*t).clone()),
        Value::Array(items) => {
            let flattened: Vec<TagNode> = items.borrow().iter().cloned().map(value_to_node).collect();
            TagNode::Tag(TagValue {
                name: None,
                attrs: Vec::new(),
                children: flattened,
                self_closing: false,
            })
        }
        other => TagNode::Value(other),
    }
}
