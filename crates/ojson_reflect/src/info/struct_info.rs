use crate::info::{DeclaredType, ResolvedType, Type, TypePath, Typed};

// -----------------------------------------------------------------------------
// TypeParam

/// One generic parameter of a struct, with the concrete argument supplied by
/// the current instantiation.
///
/// The argument list of a [`StructInfo`] is the substitution context the type
/// algebra closes [`DeclaredType::Param`] fields against.
#[derive(Clone, Debug)]
pub struct TypeParam {
    name: &'static str,
    // Built on first access; the function pointer defers the argument's info.
    arg: fn() -> ResolvedType,
}

impl TypeParam {
    /// Describes the parameter `name`, bound to `T` in this instantiation.
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            arg: ResolvedType::of::<T>,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The concrete argument bound to this parameter.
    #[inline]
    pub fn arg(&self) -> ResolvedType {
        (self.arg)()
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// The registration-time template of one named field.
///
/// The declared type may be open (`Param`/`Dyn`); closing it requires the
/// declaring instantiation's argument list. Exposure, skip, synthetic and
/// version marks are raw facts here: policy is applied by the field catalog,
/// once, when a type is first traversed.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    declared: DeclaredType,
    flatten: bool,
    skip: bool,
    synthetic: bool,
    exposed: bool,
    since: Option<f64>,
    until: Option<f64>,
}

impl FieldInfo {
    /// Creates the template for a field of statically known type `T`.
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self::with_declared(name, DeclaredType::of::<T>())
    }

    /// Creates the template with an explicit declared type.
    pub const fn with_declared(name: &'static str, declared: DeclaredType) -> Self {
        Self {
            name,
            declared,
            flatten: false,
            skip: false,
            synthetic: false,
            exposed: false,
            since: None,
            until: None,
        }
    }

    /// Re-declares this field as the declaring type's parameter `index`.
    pub const fn with_param(mut self, index: u32) -> Self {
        self.declared = DeclaredType::Param(index);
        self
    }

    /// Marks the field's contents as inlined into the declaring object.
    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Marks the field as explicitly excluded from conversion.
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Marks a compiler-mandated field with no data meaning (e.g. a
    /// `PhantomData` marker).
    pub const fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Marks the field as opted in for exposure-only engines.
    pub const fn exposed(mut self) -> Self {
        self.exposed = true;
        self
    }

    /// First version this field exists in.
    pub const fn since(mut self, version: f64) -> Self {
        self.since = Some(version);
        self
    }

    /// First version this field no longer exists in.
    pub const fn until(mut self, version: f64) -> Self {
        self.until = Some(version);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn declared(&self) -> &DeclaredType {
        &self.declared
    }

    #[inline]
    pub const fn is_flatten(&self) -> bool {
        self.flatten
    }

    #[inline]
    pub const fn is_skip(&self) -> bool {
        self.skip
    }

    #[inline]
    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    #[inline]
    pub const fn is_exposed(&self) -> bool {
        self.exposed
    }

    #[inline]
    pub const fn version_since(&self) -> Option<f64> {
        self.since
    }

    #[inline]
    pub const fn version_until(&self) -> Option<f64> {
        self.until
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Metadata for a struct: its identity, generic context and field templates
/// in declaration order.
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    generics: Box<[TypeParam]>,
    fields: Box<[FieldInfo]>,
}

impl StructInfo {
    /// Describes struct `T` with the given generic context and fields.
    pub fn new<T: TypePath>(
        generics: impl Into<Box<[TypeParam]>>,
        fields: impl Into<Box<[FieldInfo]>>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: generics.into(),
            fields: fields.into(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The generic parameters with their concrete arguments.
    #[inline]
    pub fn generics(&self) -> &[TypeParam] {
        &self.generics
    }

    /// The field templates in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Finds a field template by source name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Builds the closed descriptor of this instantiation.
    pub fn resolved(&self) -> ResolvedType {
        let args: Box<[ResolvedType]> = self.generics.iter().map(TypeParam::arg).collect();
        ResolvedType::with_args(self.ty, args)
    }
}
