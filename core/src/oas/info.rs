#![deny(missing_docs)]

//! # Info Object
//!
//! Produces the `category` classed `api` that becomes the root of the parsed
//! document, with its title, version, description and links (terms of
//! service, contact, license).

use crate::combinators::{parse_object, pipe_parse_result, step, Grammar};
use crate::context::Context;
use crate::element::{Element, Member};
use crate::oas::fields::{parse_copy, parse_string, set_title, string_of};
use crate::parse_result::ParseResult;

const NAME: &str = "Info Object";
const CONTACT: &str = "Contact Object";
const LICENSE: &str = "License Object";

const GRAMMAR: Grammar = Grammar::new(
    NAME,
    &["title", "version", "description", "termsOfService", "contact", "license"],
    &[],
);
const CONTACT_GRAMMAR: Grammar = Grammar::new(CONTACT, &["name", "url", "email"], &[]);
const LICENSE_GRAMMAR: Grammar = Grammar::new(LICENSE, &["name", "url"], &[]);

/// Parses an Info Object into an API category.
pub fn parse_info_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, NAME, value, &["title", "version"], parse_member)
            }),
            step(|info, context| build_api(context, &info)),
        ],
    )
}

fn parse_member(member: Member, context: &mut Context) -> ParseResult {
    GRAMMAR.dispatch(member, context, |key, member, context| match key {
        "title" | "version" => parse_string(NAME, member, true),
        "description" => parse_copy(context, NAME, member, false),
        "termsOfService" => parse_string(NAME, member, false),
        "contact" => parse_contact_object(context, member.value),
        _ => parse_license_object(context, member.value),
    })
}

fn build_api(context: &Context, info: &Element) -> Element {
    let mut api = context.locate(Element::new("category"), info).with_class("api");
    set_title(context, &mut api, info.get("title"));
    if let Some(version) = info.get("version") {
        api.set_attribute("version", context.locate(version.clone(), version));
    }

    let mut links = Vec::new();
    if let Some(terms) = info.get("termsOfService") {
        links.push(link(context, "terms-of-service", Some(terms), None, terms));
    }
    if let Some(contact) = info.get("contact") {
        links.extend(contact.children().iter().cloned());
    }
    if let Some(license) = info.get("license") {
        links.push(license.clone());
    }
    if !links.is_empty() {
        api.set_meta("links", Element::array(links));
    }

    if let Some(copy) = info.get("description") {
        api.push(copy.clone());
    }
    api
}

/// Parses a Contact Object into an array of `author` links.
fn parse_contact_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, CONTACT, value, &[], |member, context| {
                    CONTACT_GRAMMAR.dispatch(member, context, |_, member, _| {
                        parse_string(CONTACT, member, false)
                    })
                })
            }),
            step(|contact, context| {
                let name = contact.get("name");
                let mut links = Vec::new();
                if let Some(url) = contact.get("url") {
                    links.push(link(context, "author", Some(url), name, url));
                }
                if let Some(email) = contact.get("email") {
                    let mailto = string_of(&contact, "email").map(|e| Element::string(format!("mailto:{}", e)));
                    links.push(link(context, "author", mailto.as_ref(), name, email));
                }
                Element::array(links)
            }),
        ],
    )
}

/// Parses a License Object into a `license` link.
fn parse_license_object(context: &mut Context, element: Element) -> ParseResult {
    pipe_parse_result(
        context,
        element,
        vec![
            step(|value, context| {
                parse_object(context, LICENSE, value, &["name"], |member, context| {
                    LICENSE_GRAMMAR.dispatch(member, context, |key, member, _| {
                        parse_string(LICENSE, member, key == "name")
                    })
                })
            }),
            step(|license, context| {
                link(context, "license", license.get("url"), license.get("name"), &license)
            }),
        ],
    )
}

fn link(
    context: &Context,
    relation: &str,
    href: Option<&Element>,
    title: Option<&Element>,
    origin: &Element,
) -> Element {
    let mut link = context.locate(Element::new("link"), origin);
    link.set_attribute("relation", Element::string(relation));
    if let Some(href) = href {
        link.set_attribute("href", context.locate(href.clone(), href));
    }
    set_title(context, &mut link, title);
    link
}
