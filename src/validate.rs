//! Claim validation engine.
//!
//! Walks a claim and a value together, depth-first. Scalars are a single
//! predicate. Containers compute every child result first and then collapse
//! to `Valid` when nothing failed, so the happy path stays one variant deep.
//!
//! References are looked up by name at the moment they are needed. A name
//! missing from the lookup table, or a chain of references that loops back
//! on itself before stepping into the value, aborts the whole call.
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::claim::{Claim, Constant, Field, FieldTarget, NumberRange, StringFormat, StringRange};
use crate::error::ValidateError;
use crate::lookup::Lookup;
use crate::validation::Validation;
use crate::value::{TypeOf, Value};

/// Check `value` against `claim`, resolving references through `lookup`.
pub fn validate(claim: &Claim, value: &Value, lookup: &Lookup) -> Result<Validation, ValidateError> {
    let result = Engine { lookup }.check(claim, value, &mut Trail::default());
    if let Err(error) = &result {
        debug!(%error, "validation aborted");
    }
    result
}

struct Engine<'a> {
    lookup: &'a Lookup,
}

/// Reference names entered since the engine last stepped into a child value.
#[derive(Default)]
struct Trail<'a> {
    names: Vec<&'a str>,
}

impl<'a> Engine<'a> {
    fn check(&self, claim: &'a Claim, value: &Value, trail: &mut Trail<'a>) -> Result<Validation, ValidateError> {
        let validation = match claim {
            Claim::Constant { constant } => check_constant(constant, value),
            Claim::Number { ranges } => check_number(ranges, value),
            Claim::Integer { ranges } => check_integer(ranges, value),
            Claim::String { range } => check_string(range, value),
            Claim::Uuid => check_format(StringFormat::Uuid, value),
            Claim::DateString => check_format(StringFormat::DateString, value),
            Claim::Boolean => match value {
                Value::Bool(_) => Validation::Valid,
                _ => unexpected(TypeOf::Boolean, value),
            },
            Claim::Unknown => Validation::Valid,
            Claim::Never => Validation::NotNever { actual: value.clone() },
            Claim::Array { element } => return self.check_array(element, value),
            Claim::Tuple { slots } => return self.check_tuple(slots, value),
            Claim::Record { fields } => return self.check_record(fields, value),
            Claim::Brand { claim, .. } => return self.check(claim, value, trail),
            Claim::InstanceOf { class } => check_instance(class, value),
            Claim::Or { claims } => return self.check_union(claims, value, trail),
            Claim::IndexedReference { reference } => return self.check_reference(reference, value, trail),
        };
        Ok(validation)
    }

    /// Child values start a fresh trail: recursion that follows the value is always finite.
    fn check_child(&self, claim: &'a Claim, value: &Value) -> Result<Validation, ValidateError> {
        self.check(claim, value, &mut Trail::default())
    }

    fn check_reference(&self, name: &'a str, value: &Value, trail: &mut Trail<'a>) -> Result<Validation, ValidateError> {
        if let Some(start) = trail.names.iter().position(|seen| *seen == name) {
            let mut chain: Vec<String> = trail.names[start..].iter().map(|n| n.to_string()).collect();
            chain.push(name.to_owned());
            return Err(ValidateError::ReferenceCycle { chain });
        }
        let claim = self.lookup.resolve(name)?;
        trace!(reference = name, "resolved reference");

        trail.names.push(name);
        let result = self.check(claim, value, trail);
        trail.names.pop();
        result
    }

    fn check_array(&self, element: &'a Claim, value: &Value) -> Result<Validation, ValidateError> {
        let Value::Array(items) = value else {
            return Ok(unexpected(TypeOf::Array, value));
        };
        let validations = items
            .iter()
            .map(|item| self.check_child(element, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Validation::indexed(validations))
    }

    fn check_tuple(&self, slots: &'a [Claim], value: &Value) -> Result<Validation, ValidateError> {
        let Value::Array(items) = value else {
            return Ok(unexpected(TypeOf::Array, value));
        };
        if items.len() != slots.len() {
            return Ok(Validation::UnexpectedLength { expected: slots.len(), actual: items.len() });
        }
        let validations = slots
            .iter()
            .zip(items)
            .map(|(slot, item)| self.check_child(slot, item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Validation::indexed(validations))
    }

    fn check_record(&self, fields: &'a [Field], value: &Value) -> Result<Validation, ValidateError> {
        let Value::Object(entries) = value else {
            return Ok(unexpected(TypeOf::Object, value));
        };

        // discriminants gate the rest of the record
        for field in fields.iter().filter(|f| f.is_discriminant()) {
            let validation = self.check_field(field, entries)?.unwrap_or(Validation::Missing);
            if validation.is_failure() {
                return Ok(Validation::DiscriminantInvalid {
                    key: field.key().to_owned(),
                    validation: Box::new(validation),
                });
            }
        }

        let mut validations: IndexMap<String, Validation> = IndexMap::with_capacity(fields.len());
        for field in fields {
            let validation = if field.is_discriminant() {
                Some(Validation::Valid)
            } else {
                self.check_field(field, entries)?
            };
            let Some(validation) = validation else { continue };
            // a key declared twice keeps its first failure
            match validations.get_mut(field.key()) {
                Some(existing) if existing.is_valid() => *existing = validation,
                Some(_) => {}
                None => {
                    validations.insert(field.key().to_owned(), validation);
                }
            }
        }
        Ok(Validation::keyed(validations))
    }

    /// `None` when an optional field is absent.
    fn check_field(&self, field: &'a Field, entries: &IndexMap<String, Value>) -> Result<Option<Validation>, ValidateError> {
        let Some(value) = entries.get(field.key()) else {
            return Ok(field.is_required().then_some(Validation::Missing));
        };
        let validation = match field.target() {
            FieldTarget::Claim(claim) => self.check_child(claim, value)?,
            FieldTarget::Reference(name) => self.check_reference(name, value, &mut Trail::default())?,
        };
        Ok(Some(validation))
    }

    fn check_union(&self, claims: &'a [Claim], value: &Value, trail: &mut Trail<'a>) -> Result<Validation, ValidateError> {
        let mut validations = Vec::with_capacity(claims.len());
        for claim in claims {
            let validation = self.check(claim, value, trail)?;
            if validation.is_valid() {
                return Ok(Validation::Valid);
            }
            validations.push(validation);
        }
        Ok(Validation::UnionOfValidations { validations })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SCALARS
// ————————————————————————————————————————————————————————————————————————————

fn unexpected(expected: TypeOf, value: &Value) -> Validation {
    Validation::UnexpectedTypeOf { expected, actual: value.clone() }
}

fn check_constant(constant: &Constant, value: &Value) -> Validation {
    if constant.matches(value) {
        Validation::Valid
    } else {
        Validation::NotConstant { expected: constant.clone(), actual: value.clone() }
    }
}

fn in_ranges(ranges: &[NumberRange], n: f64) -> Validation {
    if ranges.iter().any(|range| range.contains(n)) {
        Validation::Valid
    } else {
        Validation::NotInNumberRanges { ranges: ranges.to_vec(), actual: n }
    }
}

fn check_number(ranges: &[NumberRange], value: &Value) -> Validation {
    let &Value::Number(n) = value else {
        return unexpected(TypeOf::Number, value);
    };
    in_ranges(ranges, n)
}

fn check_integer(ranges: &[NumberRange], value: &Value) -> Validation {
    let &Value::Number(n) = value else {
        return unexpected(TypeOf::Number, value);
    };
    match in_ranges(ranges, n) {
        Validation::Valid if n.is_finite() && n.fract() == 0.0 => Validation::Valid,
        Validation::Valid => Validation::NotInteger { actual: n },
        failure => failure,
    }
}

fn check_string(range: &StringRange, value: &Value) -> Validation {
    let Value::String(s) = value else {
        return unexpected(TypeOf::String, value);
    };
    if range.contains(s) {
        Validation::Valid
    } else {
        Validation::NotInStringRange { range: *range, actual: s.clone() }
    }
}

fn check_format(format: StringFormat, value: &Value) -> Validation {
    let Value::String(s) = value else {
        return unexpected(TypeOf::String, value);
    };
    if format.matches(s) {
        Validation::Valid
    } else {
        Validation::IncorrectFormat { format, actual: s.clone() }
    }
}

fn check_instance(class: &str, value: &Value) -> Validation {
    match value {
        Value::Instance(instance) if instance.is_instance_of(class) => Validation::Valid,
        _ => Validation::NotInstanceOf { class: class.to_owned(), actual: value.clone() },
    }
}
