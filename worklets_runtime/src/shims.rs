//! The class-support helpers that compiled worklet code calls into.
//!
//! Worklet code is re-serialized from transpiled sources, so it refers to
//! helpers such as `_classCallCheck` or `_createSuper` as free globals. This
//! module is the one place they are defined. Installation is staged: every
//! helper is built and checked first, then all of them are published, and a
//! failure while publishing removes whatever was already published.

use rquickjs::{Ctx, Function};

use crate::errors::{describe_js_error, BootstrapError};

/// Bumped whenever a helper's behavior changes.
pub const SHIM_VERSION: u32 = 1;

/// Frozen object holding every helper, published last.
pub const SHIMS_GLOBAL: &str = "__workletShims";

/// Names of the helpers, in the form worklet code refers to them.
pub const SHIM_NAMES: [&str; 17] = [
  "_typeof",
  "_toPrimitive",
  "_toPropertyKey",
  "_getPrototypeOf",
  "_setPrototypeOf",
  "_isNativeReflectConstruct",
  "_assertThisInitialized",
  "_possibleConstructorReturn",
  "_superPropBase",
  "_get",
  "_superPropGet",
  "_defineProperty",
  "_defineProperties",
  "_createClass",
  "_classCallCheck",
  "_inherits",
  "_createSuper",
];

const SHIM_SOURCE: &str = r#"(function (global, version, names) {
  'use strict';

  if (global.__workletShims !== undefined) {
    return global.__workletShims.version;
  }

  var required = ['create', 'defineProperty', 'getOwnPropertyDescriptor', 'getPrototypeOf'];

  for (var r = 0; r < required.length; r++) {
    if (typeof Object[required[r]] !== 'function') {
      throw new Error('Object.' + required[r] + ' is not available');
    }
  }

  function _typeof(o) {
    if (typeof Symbol === 'function' && typeof Symbol.iterator === 'symbol') {
      return typeof o;
    }

    return o && typeof Symbol === 'function' && o.constructor === Symbol && o !== Symbol.prototype
      ? 'symbol'
      : typeof o;
  }

  function _toPrimitive(input, hint) {
    if (_typeof(input) !== 'object' || input === null) {
      return input;
    }

    var prim = typeof Symbol === 'function' ? input[Symbol.toPrimitive] : undefined;

    if (prim !== undefined) {
      var res = prim.call(input, hint || 'default');

      if (_typeof(res) !== 'object') {
        return res;
      }

      throw new TypeError('@@toPrimitive must return a primitive value.');
    }

    return (hint === 'string' ? String : Number)(input);
  }

  function _toPropertyKey(arg) {
    var key = _toPrimitive(arg, 'string');
    return _typeof(key) === 'symbol' ? key : String(key);
  }

  function _getPrototypeOf(o) {
    return Object.getPrototypeOf(o);
  }

  function _setPrototypeOf(o, p) {
    if (typeof Object.setPrototypeOf === 'function') {
      return Object.setPrototypeOf(o, p);
    }

    o.__proto__ = p;
    return o;
  }

  var nativeReflectConstruct;

  function _isNativeReflectConstruct() {
    if (nativeReflectConstruct === undefined) {
      try {
        nativeReflectConstruct = !Boolean.prototype.valueOf.call(
          Reflect.construct(Boolean, [], function () {})
        );
      } catch (e) {
        nativeReflectConstruct = false;
      }
    }

    return nativeReflectConstruct;
  }

  function _assertThisInitialized(self) {
    if (self === void 0) {
      throw new ReferenceError("this hasn't been initialised - super() hasn't been called");
    }

    return self;
  }

  function _possibleConstructorReturn(self, call) {
    if (call && (_typeof(call) === 'object' || typeof call === 'function')) {
      return call;
    }

    if (call !== void 0) {
      throw new TypeError('Derived constructors may only return object or undefined');
    }

    return _assertThisInitialized(self);
  }

  function _superPropBase(object, property) {
    while (!Object.prototype.hasOwnProperty.call(object, property)) {
      object = _getPrototypeOf(object);

      if (object === null) {
        break;
      }
    }

    return object;
  }

  function _get(target, property, receiver) {
    var base = _superPropBase(target, property);

    if (!base) {
      return undefined;
    }

    var desc = Object.getOwnPropertyDescriptor(base, property);

    if (desc.get) {
      return desc.get.call(arguments.length < 3 ? target : receiver);
    }

    return desc.value;
  }

  // flags: 1 reads from the prototype, 2 binds a method result to receiver.
  function _superPropGet(classArg, property, receiver, flags) {
    var value = _get(_getPrototypeOf(flags & 1 ? classArg.prototype : classArg), property, receiver);

    if (flags & 2 && typeof value === 'function') {
      return function (args) {
        return value.apply(receiver, args);
      };
    }

    return value;
  }

  function _defineProperty(obj, key, value) {
    key = _toPropertyKey(key);

    if (key in obj) {
      Object.defineProperty(obj, key, {
        value: value,
        enumerable: true,
        configurable: true,
        writable: true,
      });
    } else {
      obj[key] = value;
    }

    return obj;
  }

  function _defineProperties(target, props) {
    for (var i = 0; i < props.length; i++) {
      var descriptor = props[i];
      descriptor.enumerable = descriptor.enumerable || false;
      descriptor.configurable = true;

      if ('value' in descriptor) {
        descriptor.writable = true;
      }

      Object.defineProperty(target, _toPropertyKey(descriptor.key), descriptor);
    }
  }

  function _createClass(Constructor, protoProps, staticProps) {
    if (protoProps) {
      _defineProperties(Constructor.prototype, protoProps);
    }

    if (staticProps) {
      _defineProperties(Constructor, staticProps);
    }

    Object.defineProperty(Constructor, 'prototype', { writable: false });
    return Constructor;
  }

  function _classCallCheck(instance, Constructor) {
    if (!(instance instanceof Constructor)) {
      throw new TypeError('Cannot call a class as a function');
    }
  }

  function _inherits(subClass, superClass) {
    if (typeof superClass !== 'function' && superClass !== null) {
      throw new TypeError('Super expression must either be null or a function');
    }

    subClass.prototype = Object.create(superClass && superClass.prototype, {
      constructor: { value: subClass, writable: true, configurable: true },
    });

    Object.defineProperty(subClass, 'prototype', { writable: false });

    if (superClass) {
      _setPrototypeOf(subClass, superClass);
    }
  }

  function _createSuper(Derived) {
    var hasNativeReflectConstruct = _isNativeReflectConstruct();

    return function () {
      var Super = _getPrototypeOf(Derived);
      var result;

      if (hasNativeReflectConstruct) {
        result = Reflect.construct(Super, arguments, _getPrototypeOf(this).constructor);
      } else {
        result = Super.apply(this, arguments);
      }

      return _possibleConstructorReturn(this, result);
    };
  }

  var shims = {
    _typeof: _typeof,
    _toPrimitive: _toPrimitive,
    _toPropertyKey: _toPropertyKey,
    _getPrototypeOf: _getPrototypeOf,
    _setPrototypeOf: _setPrototypeOf,
    _isNativeReflectConstruct: _isNativeReflectConstruct,
    _assertThisInitialized: _assertThisInitialized,
    _possibleConstructorReturn: _possibleConstructorReturn,
    _superPropBase: _superPropBase,
    _get: _get,
    _superPropGet: _superPropGet,
    _defineProperty: _defineProperty,
    _defineProperties: _defineProperties,
    _createClass: _createClass,
    _classCallCheck: _classCallCheck,
    _inherits: _inherits,
    _createSuper: _createSuper,
  };

  for (var n = 0; n < names.length; n++) {
    if (typeof shims[names[n]] !== 'function') {
      throw new Error('shim ' + names[n] + ' is missing');
    }
  }

  var published = [];

  try {
    for (var p = 0; p < names.length; p++) {
      Object.defineProperty(global, names[p], {
        value: shims[names[p]],
        writable: false,
        enumerable: false,
        configurable: true,
      });

      published.push(names[p]);
    }

    shims.version = version;

    Object.defineProperty(global, '__workletShims', {
      value: Object.freeze(shims),
      writable: false,
      enumerable: false,
      configurable: false,
    });
  } catch (e) {
    for (var u = 0; u < published.length; u++) {
      delete global[published[u]];
    }

    throw e;
  }

  return version;
})"#;

/// Installs every helper or none of them. Returns the installed version,
/// which is the one already present when the scope was set up before.
pub fn install<'js>(ctx: &Ctx<'js>) -> Result<u32, BootstrapError> {
  let installed = ctx
    .eval::<Function, _>(SHIM_SOURCE)
    .and_then(|installer| installer.call::<_, u32>((ctx.globals(), SHIM_VERSION, SHIM_NAMES.to_vec())));

  installed.map_err(|error| BootstrapError::Shims(describe_js_error(ctx, error)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use rquickjs::{Context, Runtime};

  fn with_context<R>(f: impl FnOnce(Ctx) -> R) -> R {
    let runtime = Runtime::new().unwrap();
    let context = Context::full(&runtime).unwrap();
    context.with(f)
  }

  #[test]
  fn installs_every_helper() {
    with_context(|ctx| {
      assert_eq!(install(&ctx).unwrap(), SHIM_VERSION);

      for name in SHIM_NAMES {
        let kind: String = ctx.eval(format!("typeof {}", name)).unwrap();
        assert_eq!(kind, "function", "{}", name);
      }

      let version: u32 = ctx.eval("__workletShims.version").unwrap();
      assert_eq!(version, SHIM_VERSION);
    });
  }

  #[test]
  fn second_install_keeps_the_first() {
    with_context(|ctx| {
      install(&ctx).unwrap();
      ctx.eval::<(), _>("globalThis.firstCheck = _classCallCheck").unwrap();

      assert_eq!(install(&ctx).unwrap(), SHIM_VERSION);

      let same: bool = ctx.eval("firstCheck === _classCallCheck").unwrap();
      assert!(same);
    });
  }

  #[test]
  fn transpiled_classes_work() {
    with_context(|ctx| {
      install(&ctx).unwrap();

      let result: i32 = ctx
        .eval(
          r#"
          var Base = (function () {
            function Base(x) { _classCallCheck(this, Base); this.x = x; }
            _createClass(Base, [{ key: 'value', value: function value() { return this.x; } }]);
            return Base;
          })();

          var Derived = (function (_Base) {
            _inherits(Derived, _Base);
            var _super = _createSuper(Derived);
            function Derived(x) { _classCallCheck(this, Derived); return _super.call(this, x * 2); }
            _createClass(Derived, [{
              key: 'value',
              value: function value() { return _get(_getPrototypeOf(Derived.prototype), 'value', this).call(this) + 1; }
            }]);
            return Derived;
          })(Base);

          new Derived(20).value();
          "#,
        )
        .unwrap();

      assert_eq!(result, 41);
    });
  }

  #[test]
  fn missing_primitive_installs_nothing() {
    with_context(|ctx| {
      ctx.eval::<(), _>("delete Object.getOwnPropertyDescriptor").unwrap();

      match install(&ctx) {
        Err(BootstrapError::Shims(message)) => {
          assert!(message.contains("getOwnPropertyDescriptor"), "{}", message)
        }
        other => panic!("expected a shim failure, got {:?}", other),
      }

      let leftovers: String = ctx
        .eval("typeof __workletShims + ' ' + typeof _classCallCheck + ' ' + typeof _typeof")
        .unwrap();

      assert_eq!(leftovers, "undefined undefined undefined");
    });
  }
}
