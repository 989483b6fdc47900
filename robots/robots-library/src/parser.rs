//! Description and manifest XML parsers.
//!
//! A description document holds either a single mechanism element or any
//! container element wrapping several of them:
//!
//! ```xml
//! <Track model="IRBT4004" manufacturer="ABB" payload="3000" movesRobot="true">
//!   <Base x="0" y="0" z="0" q1="1" q2="0" q3="0" q4="0"/>
//!   <Joints>
//!     <Prismatic number="7" a="0" d="0" minrange="0" maxrange="4000" maxspeed="2000"/>
//!   </Joints>
//! </Track>
//! ```
//!
//! A geometry manifest lists the mesh files of every model, base first:
//!
//! ```xml
//! <Geometry>
//!   <Model name="Track.ABB.IRBT4004">
//!     <Mesh file="irbt4004/base.stl"/>
//!     <Mesh file="irbt4004/carriage.stl"/>
//!   </Model>
//! </Geometry>
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use robots_geometry::{deg_to_rad, UNIT_TOL};
use robots_kinematics::{JointKind, Manufacturer, MechanismKind};

use crate::error::{LibraryError, Result};
use crate::types::{BasePose, JointDescription, MechanismDescription};

/// Parse every mechanism element in a description document.
///
/// # Errors
///
/// Returns an error if the XML is malformed, a required element or
/// attribute is missing, or the document contains no mechanism.
pub fn parse_descriptions_str(xml: &str) -> Result<Vec<MechanismDescription>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut descriptions = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                // Anything that is not a mechanism is treated as a container.
                if let Some(kind) = mechanism_kind(e) {
                    descriptions.push(parse_mechanism(&mut reader, e, kind)?);
                }
            }
            Ok(Event::Empty(ref e)) => {
                if mechanism_kind(e).is_some() {
                    return Err(LibraryError::missing_element("Base", element_name(e)));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(LibraryError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    if descriptions.is_empty() {
        return Err(LibraryError::missing_element(
            "RobotArm, Positioner or Track",
            "description document",
        ));
    }
    Ok(descriptions)
}

/// Parse a document expected to describe exactly one mechanism.
///
/// If the document holds several, the first is returned.
///
/// # Errors
///
/// See [`parse_descriptions_str`].
pub fn parse_description_str(xml: &str) -> Result<MechanismDescription> {
    let mut descriptions = parse_descriptions_str(xml)?;
    Ok(descriptions.swap_remove(0))
}

fn mechanism_kind(e: &BytesStart) -> Option<MechanismKind> {
    std::str::from_utf8(e.name().as_ref())
        .ok()
        .and_then(|name| name.parse().ok())
}

/// Parse a mechanism element and its children.
fn parse_mechanism<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart,
    kind: MechanismKind,
) -> Result<MechanismDescription> {
    let model = get_attribute(start, "model")?;
    let manufacturer_name = get_attribute(start, "manufacturer")?;
    let manufacturer: Manufacturer = manufacturer_name
        .parse()
        .map_err(LibraryError::UnknownManufacturer)?;
    let payload = float_attribute(start, "payload")?;
    let moves_robot = get_attribute_opt(start, "movesRobot")
        .map(|s| parse_bool(&s, "movesRobot", start))
        .transpose()?
        .unwrap_or(false);

    let context = format!("{kind} {model}");
    let mut base: Option<BasePose> = None;
    let mut joints: Option<Vec<JointDescription>> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let elem_name = e.name().as_ref().to_vec();
                match elem_name.as_slice() {
                    b"Base" => {
                        base = Some(parse_base(e)?);
                        skip_element(reader, &elem_name)?;
                    }
                    b"Joints" => joints = Some(parse_joints(reader)?),
                    _ => skip_element(reader, &elem_name)?,
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"Base" => base = Some(parse_base(e)?),
                b"Joints" => joints = Some(Vec::new()),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == start.name().as_ref() => break,
            Ok(Event::Eof) => {
                return Err(LibraryError::XmlParse(format!("unexpected EOF in {context}")))
            }
            Ok(_) => {}
            Err(e) => return Err(LibraryError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(MechanismDescription {
        kind,
        manufacturer,
        model,
        payload,
        moves_robot,
        base: base.ok_or_else(|| LibraryError::missing_element("Base", context.clone()))?,
        joints: joints.ok_or_else(|| LibraryError::missing_element("Joints", context))?,
    })
}

/// Parse base element attributes.
fn parse_base(e: &BytesStart) -> Result<BasePose> {
    let base = BasePose {
        x: float_attribute(e, "x")?,
        y: float_attribute(e, "y")?,
        z: float_attribute(e, "z")?,
        q1: float_attribute(e, "q1")?,
        q2: float_attribute(e, "q2")?,
        q3: float_attribute(e, "q3")?,
        q4: float_attribute(e, "q4")?,
    };

    // a zero quaternion has no orientation to normalise to
    let norm = [base.q1, base.q2, base.q3, base.q4]
        .iter()
        .map(|q| q * q)
        .sum::<f64>()
        .sqrt();
    if norm < UNIT_TOL {
        return Err(LibraryError::invalid_attribute(
            "q1",
            element_name(e),
            "quaternion q1..q4 has zero length",
        ));
    }
    Ok(base)
}

/// Parse the joints container.
fn parse_joints<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<JointDescription>> {
    let mut joints = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                joints.push(parse_joint(e)?);
                let elem_name = e.name().as_ref().to_vec();
                skip_element(reader, &elem_name)?;
            }
            Ok(Event::Empty(ref e)) => joints.push(parse_joint(e)?),
            Ok(Event::End(ref e)) if e.name().as_ref() == b"Joints" => break,
            Ok(Event::Eof) => return Err(LibraryError::XmlParse("unexpected EOF in Joints".into())),
            Ok(_) => {}
            Err(e) => return Err(LibraryError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(joints)
}

/// Parse a joint element.
fn parse_joint(e: &BytesStart) -> Result<JointDescription> {
    let name = element_name(e);
    let kind: JointKind = name.parse().map_err(LibraryError::UnknownJointType)?;

    let number = get_attribute(e, "number")?
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| {
            LibraryError::invalid_attribute("number", &name, "expected an axis number from 1")
        })?;

    let max_speed = float_attribute(e, "maxspeed")?;
    let max_speed = match kind {
        JointKind::Revolute => deg_to_rad(max_speed),
        JointKind::Prismatic => max_speed,
    };

    Ok(JointDescription {
        kind,
        number,
        a: float_attribute(e, "a")?,
        d: float_attribute(e, "d")?,
        min_range: float_attribute(e, "minrange")?,
        max_range: float_attribute(e, "maxrange")?,
        max_speed,
    })
}

/// Parse a geometry manifest into model name and mesh file lists.
///
/// # Errors
///
/// Returns an error if the XML is malformed, a model or mesh lacks its
/// attribute, or a model name appears twice.
pub fn parse_manifest_str(xml: &str) -> Result<HashMap<String, Vec<String>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut models = HashMap::new();
    let mut current: Option<(String, Vec<String>)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"Model" => {
                current = Some((get_attribute(e, "name")?, Vec::new()));
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"Model" => insert_model(&mut models, get_attribute(e, "name")?, Vec::new())?,
                b"Mesh" => {
                    let file = get_attribute(e, "file")?;
                    match current.as_mut() {
                        Some((_, files)) => files.push(file),
                        None => return Err(LibraryError::missing_element("Model", "Mesh")),
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"Model" => {
                if let Some((name, files)) = current.take() {
                    insert_model(&mut models, name, files)?;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(LibraryError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(models)
}

fn insert_model(
    models: &mut HashMap<String, Vec<String>>,
    name: String,
    files: Vec<String>,
) -> Result<()> {
    if models.contains_key(&name) {
        return Err(LibraryError::DuplicateModel(name));
    }
    models.insert(name, files);
    Ok(())
}

/// Get a required attribute value.
fn get_attribute(e: &BytesStart, name: &'static str) -> Result<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec())
                .map_err(|_| LibraryError::invalid_attribute(name, element_name(e), "invalid UTF-8"));
        }
    }
    Err(LibraryError::missing_attribute(name, element_name(e)))
}

/// Get an optional attribute value.
fn get_attribute_opt(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

/// Parse a required float attribute.
fn float_attribute(e: &BytesStart, name: &'static str) -> Result<f64> {
    let value = get_attribute(e, name)?;
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            LibraryError::invalid_attribute(
                name,
                element_name(e),
                format!("expected a finite number, got {value:?}"),
            )
        })
}

/// Parse an XML schema boolean.
fn parse_bool(s: &str, name: &'static str, e: &BytesStart) -> Result<bool> {
    match s.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(LibraryError::invalid_attribute(
            name,
            element_name(e),
            "expected true or false",
        )),
    }
}

/// Get element name as string for error messages.
fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Skip an element and all its children.
fn skip_element<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> Result<()> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == name => {
                depth += 1;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == name => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(LibraryError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(())
}
