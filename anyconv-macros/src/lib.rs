#![doc = include_str!("../README.md")]

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, GenericParam, LitStr, parse_macro_input, parse_quote};

/// Derives `anyconv::Reflect` and `anyconv::Typed` for a struct with named
/// fields.
///
/// The struct must also implement `Clone` and `Default`.
///
/// # Field attributes
///
/// `#[conv(...)]` on a field takes any number of:
///
/// - `name = "value"`: a struct tag, e.g. `json = "id,omitempty"` or
///   `gconv = "uid"`. Any tag name is accepted.
/// - `flatten`: the field is embedded; its own fields can be bound and read
///   as if they belonged to the outer struct.
///
/// # Container attributes
///
/// `#[conv(...)]` on the struct enables conversion hooks, each of which
/// requires the matching trait implementation:
///
/// | attribute         | trait                        |
/// |-------------------|------------------------------|
/// | `unmarshal_value` | `anyconv::UnmarshalValue`    |
/// | `unmarshal_text`  | `anyconv::UnmarshalText`     |
/// | `unmarshal_json`  | `anyconv::UnmarshalJson`     |
/// | `set_value`       | `anyconv::SetValue`          |
/// | `display`         | `core::fmt::Display`         |
/// | `to_bytes`        | `anyconv::ToBytes`           |
/// | `map_str_any`     | `anyconv::MapStrAny`         |
///
/// ```ignore
/// #[derive(Reflect, Clone, Default)]
/// #[conv(unmarshal_text)]
/// struct Version {
///     major: u32,
///     minor: u32,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(conv))]
pub fn derive_reflect(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Container-level hooks, in the order of `Capabilities` flags.
const HOOKS: &[Hook] = &[
    Hook {
        attr: "unmarshal_value",
        flag: "UNMARSHAL_VALUE",
        method: "as_unmarshal_value",
        target: "UnmarshalValue",
        mutable: true,
    },
    Hook {
        attr: "unmarshal_text",
        flag: "UNMARSHAL_TEXT",
        method: "as_unmarshal_text",
        target: "UnmarshalText",
        mutable: true,
    },
    Hook {
        attr: "unmarshal_json",
        flag: "UNMARSHAL_JSON",
        method: "as_unmarshal_json",
        target: "UnmarshalJson",
        mutable: true,
    },
    Hook {
        attr: "set_value",
        flag: "SET_VALUE",
        method: "as_set_value",
        target: "SetValue",
        mutable: true,
    },
    Hook {
        attr: "display",
        flag: "DISPLAY",
        method: "as_display",
        target: "",
        mutable: false,
    },
    Hook {
        attr: "to_bytes",
        flag: "TO_BYTES",
        method: "as_to_bytes",
        target: "ToBytes",
        mutable: false,
    },
    Hook {
        attr: "map_str_any",
        flag: "MAP_STR_ANY",
        method: "as_map_str_any",
        target: "MapStrAny",
        mutable: false,
    },
];

struct Hook {
    attr: &'static str,
    flag: &'static str,
    method: &'static str,
    /// Trait under `::anyconv`; empty for `core::fmt::Display`.
    target: &'static str,
    mutable: bool,
}

impl Hook {
    fn accessor(&self) -> TokenStream {
        let method = format_ident!("{}", self.method);
        let target = if self.target.is_empty() {
            quote! { ::core::fmt::Display }
        } else {
            let ident = format_ident!("{}", self.target);
            quote! { ::anyconv::#ident }
        };
        if self.mutable {
            quote! {
                fn #method(&mut self) -> ::core::option::Option<&mut dyn #target> {
                    ::core::option::Option::Some(self)
                }
            }
        } else {
            quote! {
                fn #method(&self) -> ::core::option::Option<&dyn #target> {
                    ::core::option::Option::Some(self)
                }
            }
        }
    }
}

struct FieldDecl {
    name: String,
    tags: Vec<(String, String)>,
    flatten: bool,
}

fn parse_field_attrs(field: &syn::Field, name: String) -> syn::Result<FieldDecl> {
    let mut decl = FieldDecl {
        name,
        tags: Vec::new(),
        flatten: false,
    };
    for attr in &field.attrs {
        if !attr.path().is_ident("conv") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let Some(ident) = meta.path.get_ident() else {
                return Err(meta.error("expected a tag name or `flatten`"));
            };
            if meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                decl.tags.push((ident.to_string(), value.value()));
            } else if ident == "flatten" {
                decl.flatten = true;
            } else {
                return Err(meta.error(format!(
                    "unknown field attribute `{ident}`, expected `flatten` or `tag = \"...\"`"
                )));
            }
            Ok(())
        })?;
    }
    Ok(decl)
}

fn parse_container_attrs(input: &DeriveInput) -> syn::Result<Vec<&'static Hook>> {
    let mut hooks = Vec::new();
    for attr in &input.attrs {
        if !attr.path().is_ident("conv") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let hook = HOOKS
                .iter()
                .find(|h| meta.path.is_ident(h.attr))
                .ok_or_else(|| meta.error("unknown container attribute"))?;
            if !hooks.iter().any(|h: &&Hook| h.attr == hook.attr) {
                hooks.push(hook);
            }
            Ok(())
        })?;
    }
    Ok(hooks)
}

fn derive_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let type_identifier = name.to_string();

    let no_fields = syn::punctuated::Punctuated::new();
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => &no_fields,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Reflect can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs",
            ));
        }
    };

    if let Some(lt) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lt,
            "Reflect types must be 'static and cannot have lifetime parameters",
        ));
    }

    let hooks = parse_container_attrs(input)?;

    let mut field_shapes = Vec::new();
    let mut field_refs = Vec::new();
    let mut field_muts = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let raw_name = ident.to_string();
        let field_name = raw_name.strip_prefix("r#").unwrap_or(&raw_name).to_owned();
        let decl = parse_field_attrs(field, field_name)?;
        let ty = &field.ty;

        let FieldDecl {
            name: decl_name,
            tags,
            flatten,
        } = decl;
        let tags = tags.iter().map(|(k, v)| quote! { (#k, #v) });
        let flags = if flatten {
            quote! { ::anyconv::FieldFlags::FLATTEN }
        } else {
            quote! { ::anyconv::FieldFlags::empty() }
        };
        field_shapes.push(quote! {
            ::anyconv::Field {
                name: #decl_name,
                shape: ::anyconv::shape_of::<#ty>,
                tags: &[#(#tags),*],
                flags: #flags,
            }
        });
        field_refs.push(quote! { #index => ::core::option::Option::Some(&self.#ident) });
        field_muts.push(quote! { #index => ::core::option::Option::Some(&mut self.#ident) });
    }
    let field_count = fields.len();

    let capabilities = hooks.iter().fold(
        quote! { ::anyconv::Capabilities::empty() },
        |acc, hook| {
            let flag = format_ident!("{}", hook.flag);
            quote! { #acc.union(::anyconv::Capabilities::#flag) }
        },
    );
    let accessors = hooks.iter().map(|h| h.accessor());

    let mut generics = input.generics.clone();
    let type_params: Vec<_> = generics
        .params
        .iter()
        .filter_map(|p| match p {
            GenericParam::Type(t) => Some(t.ident.clone()),
            _ => None,
        })
        .collect();
    {
        let where_clause = generics.make_where_clause();
        for param in &type_params {
            where_clause.predicates.push(parse_quote! {
                #param: ::anyconv::Typed + ::core::clone::Clone + ::core::default::Default
            });
        }
        where_clause.predicates.push(parse_quote! {
            Self: ::core::clone::Clone + ::core::default::Default
        });
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::anyconv::Typed for #name #ty_generics #where_clause {
            const SHAPE: &'static ::anyconv::Shape = &const {
                ::anyconv::Shape {
                    id: ::core::any::TypeId::of::<Self>,
                    type_identifier: #type_identifier,
                    def: ::anyconv::Def::Struct(&const {
                        ::anyconv::StructType {
                            fields: &const { [#(#field_shapes),*] },
                        }
                    }),
                    capabilities: #capabilities,
                }
            };
        }

        #[automatically_derived]
        impl #impl_generics ::anyconv::Reflect for #name #ty_generics #where_clause {
            fn shape(&self) -> &'static ::anyconv::Shape {
                <Self as ::anyconv::Typed>::SHAPE
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn as_reflect(&self) -> &dyn ::anyconv::Reflect {
                self
            }

            fn peek(&self) -> ::anyconv::Peek<'_> {
                ::anyconv::Peek::Struct(self)
            }

            fn poke(&mut self) -> ::anyconv::Poke<'_> {
                ::anyconv::Poke::Struct(self)
            }

            fn clone_boxed(&self) -> ::std::boxed::Box<dyn ::anyconv::Reflect> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn assign_from(&mut self, src: &dyn ::anyconv::Reflect) -> bool {
                match src.as_any().downcast_ref::<Self>() {
                    ::core::option::Option::Some(v) => {
                        *self = ::core::clone::Clone::clone(v);
                        true
                    }
                    ::core::option::Option::None => false,
                }
            }

            fn reset(&mut self) {
                *self = ::core::default::Default::default();
            }

            #(#accessors)*
        }

        #[automatically_derived]
        impl #impl_generics ::anyconv::Struct for #name #ty_generics #where_clause {
            fn field_count(&self) -> usize {
                #field_count
            }

            #[allow(unreachable_patterns)]
            fn field(&self, index: usize) -> ::core::option::Option<&dyn ::anyconv::Reflect> {
                match index {
                    #(#field_refs,)*
                    _ => ::core::option::Option::None,
                }
            }

            #[allow(unreachable_patterns)]
            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::anyconv::Reflect> {
                match index {
                    #(#field_muts,)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
